use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// An outgoing request, as seen by an [`ExpectationManager`] before it reaches the network.
///
/// Each matcher gets an immutable reference to a `Request` instance in the [`matches`] method
/// defined in the [`Match`] trait; responders get the same reference in [`respond`].
///
/// Relative URLs (e.g. `/hello`) are resolved against `http://localhost`, so tests can declare
/// and issue requests without caring about the host.
///
/// ```rust
/// use mockrest::Request;
///
/// let request = Request::new("post", "/greetings?lang=en")
///     .header("content-type", "application/json")
///     .body(r#"{"name": "world"}"#);
///
/// assert_eq!(request.method, "POST");
/// assert_eq!(request.url.as_str(), "http://localhost/greetings?lang=en");
/// ```
///
/// [`ExpectationManager`]: crate::ExpectationManager
/// [`matches`]: crate::Match::matches
/// [`Match`]: crate::Match
/// [`respond`]: crate::Respond::respond
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    /// Start building a request with the given method and URL.
    ///
    /// # Panics
    /// If the method or the URL cannot be parsed.
    pub fn new<M, U>(method: M, url: U) -> Self
    where
        M: AsRef<str>,
        U: AsRef<str>,
    {
        let method = Method::from_str(&method.as_ref().to_ascii_uppercase())
            .expect("Failed to convert to HTTP method.");
        Self {
            url: parse_url(url.as_ref()),
            method,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Shorthand for `Request::new("GET", url)`.
    pub fn get<U: AsRef<str>>(url: U) -> Self {
        Self::new("GET", url)
    }

    /// Shorthand for `Request::new("POST", url)`.
    pub fn post<U: AsRef<str>>(url: U) -> Self {
        Self::new("POST", url)
    }

    /// Append a header value. Existing values for the same name are kept.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert into header name.");
        let value = value
            .try_into()
            .expect("Failed to convert into header value.");
        self.headers.append(key, value);
        self
    }

    /// Set the raw request body.
    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Set the body to the JSON serialization of `body` and the content type to
    /// `application/json`.
    pub fn json<B: Serialize>(mut self, body: &B) -> Self {
        self.body = serde_json::to_vec(body).expect("Failed to serialize JSON body.");
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self
    }

    pub fn body_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Path plus query string, e.g. `/hello?lang=en`.
    pub(crate) fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }
}

pub(crate) fn parse_url(url: &str) -> Url {
    match Url::parse(url) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost")
            .and_then(|base| base.join(url))
            .expect("Failed to parse relative URL."),
        Err(e) => panic!("Failed to parse URL `{}`: {}", url, e),
    }
}

/// One line per request: method, URL and, if there are any, headers.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        if !self.headers.is_empty() {
            write!(f, ", headers: {:?}", self.headers)?;
        }
        Ok(())
    }
}

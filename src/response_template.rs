use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use std::convert::TryInto;

/// The synthetic response handed back to the client in place of a network round trip.
pub type Response = http::Response<Vec<u8>>;

/// The blueprint for the response returned when a declared expectation matches a request.
///
/// ```rust
/// use mockrest::ResponseTemplate;
///
/// let response = ResponseTemplate::new(200)
///     .insert_header("X-Correlation-ID", "1311db4f")
///     .set_body_string("hello")
///     .generate_response();
///
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.headers()["content-type"], "text/plain");
/// assert_eq!(response.body(), b"hello");
/// ```
#[derive(Clone, Debug)]
pub struct ResponseTemplate {
    mime: String,
    status_code: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

// `mockrest` is a crate meant for testing - failures are most likely not handled/temporary mistakes.
// Hence we prefer to panic and provide an easier API than to use `Result`s thus pushing
// the burden of "correctness" (and conversions) on the user.
impl ResponseTemplate {
    /// Start building a `ResponseTemplate` specifying the status code of the response.
    pub fn new<S>(s: S) -> Self
    where
        S: TryInto<StatusCode>,
        <S as TryInto<StatusCode>>::Error: std::fmt::Debug,
    {
        let status_code = s.try_into().expect("Failed to convert into status code.");
        Self {
            status_code,
            headers: HeaderMap::new(),
            mime: String::new(),
            body: None,
        }
    }

    /// Append a header `value` to list of headers with `key` as header name.
    ///
    /// Unlike `insert_header`, this function will not override the contents of a header.
    pub fn append_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert into header name.");
        let value = value
            .try_into()
            .expect("Failed to convert into header value.");
        self.headers.append(key, value);
        self
    }

    /// Insert a header `value` with `key` as header name, dropping previous values.
    pub fn insert_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert into header name.");
        let value = value
            .try_into()
            .expect("Failed to convert into header value.");
        self.headers.insert(key, value);
        self
    }

    /// Set the response body with bytes.
    ///
    /// It sets "Content-Type" to "application/octet-stream".
    pub fn set_body_bytes<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self.mime = "application/octet-stream".to_string();
        self
    }

    /// Set the response body from a JSON-serializable value.
    ///
    /// It sets "Content-Type" to "application/json".
    pub fn set_body_json<B: Serialize>(mut self, body: B) -> Self {
        let body = serde_json::to_vec(&body).expect("Failed to convert into body.");

        self.body = Some(body);
        self.mime = "application/json".to_string();
        self
    }

    /// Set the response body to a string.
    ///
    /// It sets "Content-Type" to "text/plain".
    pub fn set_body_string<T: Into<String>>(mut self, body: T) -> Self {
        self.body = Some(body.into().into_bytes());
        self.mime = "text/plain".to_string();
        self
    }

    /// Set a raw response body. The mime type needs to be set because the
    /// raw body could be of any type.
    pub fn set_body_raw<B: Into<Vec<u8>>>(mut self, body: B, mime: &str) -> Self {
        self.body = Some(body.into());
        self.mime = mime.to_string();
        self
    }

    /// Set only the "Content-Type", leaving the body untouched.
    pub fn set_mime(mut self, mime: &str) -> Self {
        self.mime = mime.to_string();
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Generate a response from the template.
    pub fn generate_response(&self) -> Response {
        let mut headers = self.headers.clone();
        // Set content-type, if needed
        if !self.mime.is_empty() {
            let mime = HeaderValue::from_str(&self.mime)
                .expect("Failed to convert mime into header value.");
            headers.insert(http::header::CONTENT_TYPE, mime);
        }

        let mut response = Response::new(self.body.clone().unwrap_or_default());
        *response.status_mut() = self.status_code;
        *response.headers_mut() = headers;
        response
    }
}

//! A collection of different matching strategies provided out-of-the-box by `mockrest`.
//!
//! If the set of matchers provided out-of-the-box is not enough for your specific testing needs
//! you can implement your own thanks to the [`Match`] trait.
//!
//! Furthermore, `Fn` closures that take an immutable [`Request`] reference as input and return a
//! boolean automatically implement [`Match`] and can be used where a matcher is expected.
//!
//! Every matcher explains a rejection with an [`Error::Mismatch`], e.g.
//! `Unexpected Request. expected: </hello> but was: </goodbye>`.
use crate::request::parse_url;
use crate::{Error, Match, Request};
use assert_json_diff::{assert_json_matches_no_panic, CompareMode};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use http::{HeaderName, HeaderValue, Method};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::TryInto;
use std::fmt::Display;
use std::str::{self, FromStr};
use url::{form_urlencoded, Url};

fn assert_equal<E, A>(message: &str, expected: E, actual: A) -> Result<(), Error>
where
    E: PartialEq<A> + Display,
    A: Display,
{
    if expected == actual {
        Ok(())
    } else {
        Err(Error::Mismatch(format!(
            "{} expected: <{}> but was: <{}>",
            message, expected, actual
        )))
    }
}

fn fail<T>(message: String) -> Result<T, Error> {
    Err(Error::Mismatch(message))
}

fn assert_count(kind: &str, name: &str, values: &[String], count: usize) -> Result<(), Error> {
    if count > values.len() {
        return fail(format!(
            "Expected {} <{}> to have at least <{}> values but found {:?}",
            kind, name, count, values
        ));
    }
    Ok(())
}

fn body_as_json(request: &Request) -> Result<Value, Error> {
    serde_json::from_slice(&request.body).map_err(|e| Error::BodyConversion(e.into()))
}

#[derive(Debug)]
/// Match all requests, regardless of their method, path, headers or body.
///
/// You can use it to verify that a request has been issued, without making
/// any other assertion about it.
pub struct AnyMatcher;

/// Shorthand for [`AnyMatcher`].
pub fn any() -> AnyMatcher {
    AnyMatcher
}

impl Match for AnyMatcher {
    fn matches(&self, _request: &Request) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Debug)]
/// Match **exactly** the method of a request.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::method;
/// use mockrest::{Match, Request};
///
/// let matcher = method("get");
///
/// assert!(matcher.matches(&Request::get("/")).is_ok());
/// assert_eq!(
///     matcher.matches(&Request::post("/")).unwrap_err().to_string(),
///     "Unexpected Method. expected: <GET> but was: <POST>"
/// );
/// ```
pub struct MethodExactMatcher(Method);

/// Shorthand for [`MethodExactMatcher::new`].
pub fn method<T>(method: T) -> MethodExactMatcher
where
    T: AsRef<str>,
{
    MethodExactMatcher::new(method)
}

impl MethodExactMatcher {
    pub fn new<T>(method: T) -> Self
    where
        T: AsRef<str>,
    {
        let method = Method::from_str(&method.as_ref().to_ascii_uppercase())
            .expect("Failed to convert to HTTP method.");
        Self(method)
    }
}

impl Match for MethodExactMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        assert_equal("Unexpected Method.", &self.0, &request.method)
    }
}

#[derive(Debug)]
/// Match the URI of a request.
///
/// An absolute URL is compared with the full request URL; anything else (e.g. `/hello?a=b`)
/// is compared with the path and query of the request.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::request_to;
/// use mockrest::{Match, Request};
///
/// assert!(request_to("/hello").matches(&Request::get("/hello")).is_ok());
/// assert!(request_to("http://localhost/hello").matches(&Request::get("/hello")).is_ok());
/// assert_eq!(
///     request_to("/hello").matches(&Request::get("/goodbye")).unwrap_err().to_string(),
///     "Unexpected Request. expected: </hello> but was: </goodbye>"
/// );
/// ```
pub struct RequestToMatcher(Target);

#[derive(Debug)]
enum Target {
    Absolute(Url),
    Relative(String),
}

/// Shorthand for [`RequestToMatcher::new`].
pub fn request_to<T>(uri: T) -> RequestToMatcher
where
    T: AsRef<str>,
{
    RequestToMatcher::new(uri)
}

impl RequestToMatcher {
    pub fn new<T: AsRef<str>>(uri: T) -> Self {
        let uri = uri.as_ref();
        match Url::parse(uri) {
            Ok(url) => Self(Target::Absolute(url)),
            Err(_) => Self(Target::Relative(parse_url(uri)[url::Position::BeforePath..].to_string())),
        }
    }
}

impl Match for RequestToMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        match &self.0 {
            Target::Absolute(url) => assert_equal("Unexpected Request.", url, &request.url),
            Target::Relative(path) => {
                assert_equal("Unexpected Request.", path, &request.path_and_query())
            }
        }
    }
}

#[derive(Debug)]
/// Match **exactly** the path of a request, ignoring the query string.
pub struct PathExactMatcher(String);

/// Shorthand for [`PathExactMatcher::new`].
pub fn path<T>(path: T) -> PathExactMatcher
where
    T: Into<String>,
{
    PathExactMatcher::new(path)
}

impl PathExactMatcher {
    /// # Panics
    /// If `path` contains a query string or a host.
    pub fn new<T: Into<String>>(path: T) -> Self {
        let path = path.into();

        if path.contains('?') {
            panic!(
                "mockrest can't match the path `{}` because it contains a `?`. You must use `mockrest::matchers::query_param` to match on query parameters (the part of the path after the `?`).",
                path
            );
        }

        if let Ok(url) = Url::parse(&path) {
            if let Some(host) = url.host_str() {
                panic!(
                    "mockrest can't match the path `{}` because it contains the host `{}`. Use `mockrest::matchers::request_to` to match on the full URL, or try replacing your path with `path(\"{}\")`",
                    path,
                    host,
                    url.path()
                );
            }
        }

        // Prepend "/" to the path if missing.
        if path.starts_with('/') {
            Self(path)
        } else {
            Self(format!("/{}", path))
        }
    }
}

impl Match for PathExactMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        assert_equal("Unexpected Path.", self.0.as_str(), request.url.path())
    }
}

#[derive(Debug)]
/// Match the path of a request against a regular expression.
pub struct PathRegexMatcher(Regex);

/// Shorthand for [`PathRegexMatcher::new`].
pub fn path_regex<T>(path: T) -> PathRegexMatcher
where
    T: AsRef<str>,
{
    PathRegexMatcher::new(path)
}

impl PathRegexMatcher {
    pub fn new<T: AsRef<str>>(path: T) -> Self {
        let path = path.as_ref();

        Self(Regex::new(path).expect("Failed to create regex for path matcher"))
    }
}

impl Match for PathRegexMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        if self.0.is_match(request.url.path()) {
            Ok(())
        } else {
            fail(format!(
                "Expected path to match <{}> but was: <{}>",
                self.0,
                request.url.path()
            ))
        }
    }
}

#[derive(Debug)]
/// Match the values of a header, in order.
///
/// The request must carry at least as many values as expected; the first ones must equal
/// the expected values one by one. Comma-separated values in a single header line are split
/// before the comparison.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::{header, headers};
/// use mockrest::{Match, Request};
///
/// let request = Request::get("/").header("cache-control", "no-cache, no-store");
///
/// assert!(headers("cache-control", vec!["no-cache", "no-store"]).matches(&request).is_ok());
/// assert!(header("cache-control", "no-cache").matches(&request).is_ok());
/// assert!(header("cache-control", "no-store").matches(&request).is_err());
/// ```
pub struct HeaderExactMatcher(HeaderName, Vec<HeaderValue>);

/// Shorthand for [`HeaderExactMatcher::new`].
pub fn header<K, V>(key: K, value: V) -> HeaderExactMatcher
where
    K: TryInto<HeaderName>,
    <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
    V: TryInto<HeaderValue>,
    <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
{
    HeaderExactMatcher::new(key, vec![value])
}

/// Shorthand for [`HeaderExactMatcher::new`] supporting multi valued headers.
pub fn headers<K, V>(key: K, values: Vec<V>) -> HeaderExactMatcher
where
    K: TryInto<HeaderName>,
    <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
    V: TryInto<HeaderValue>,
    <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
{
    HeaderExactMatcher::new(key, values)
}

impl HeaderExactMatcher {
    pub fn new<K, V>(key: K, values: Vec<V>) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert to header name.");
        let values = values
            .into_iter()
            .map(|value| {
                value
                    .try_into()
                    .expect("Failed to convert to header value.")
            })
            .collect();
        Self(key, values)
    }
}

impl Match for HeaderExactMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        if !request.headers.contains_key(&self.0) {
            return fail(format!("Expected header <{}> to exist but was missing", self.0));
        }
        let values = request
            .headers
            .get_all(&self.0)
            .iter()
            .flat_map(|v| {
                String::from_utf8_lossy(v.as_bytes())
                    .split(',')
                    .map(|v| v.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert_count("header", self.0.as_str(), &values, self.1.len())?;
        // order matters
        self.1.iter().zip(&values).try_for_each(|(expected, actual)| {
            assert_equal(
                &format!("Request header [{}]", self.0),
                String::from_utf8_lossy(expected.as_bytes()),
                actual.as_str(),
            )
        })
    }
}

#[derive(Debug)]
/// Match **exactly** the header name of a request. It checks that the
/// header is present but does not validate the value.
pub struct HeaderExistsMatcher(HeaderName);

/// Shorthand for [`HeaderExistsMatcher::new`].
pub fn header_exists<K>(key: K) -> HeaderExistsMatcher
where
    K: TryInto<HeaderName>,
    <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
{
    HeaderExistsMatcher::new(key)
}

impl HeaderExistsMatcher {
    pub fn new<K>(key: K) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert to header name.");
        Self(key)
    }
}

impl Match for HeaderExistsMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        if request.headers.contains_key(&self.0) {
            Ok(())
        } else {
            fail(format!("Expected header <{}> to exist but was missing", self.0))
        }
    }
}

#[derive(Debug)]
/// Match requests that do **not** carry the given header.
pub struct HeaderMissingMatcher(HeaderName);

/// Shorthand for [`HeaderMissingMatcher::new`].
pub fn header_does_not_exist<K>(key: K) -> HeaderMissingMatcher
where
    K: TryInto<HeaderName>,
    <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
{
    HeaderMissingMatcher::new(key)
}

impl HeaderMissingMatcher {
    pub fn new<K>(key: K) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert to header name.");
        Self(key)
    }
}

impl Match for HeaderMissingMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let values = request.headers.get_all(&self.0).iter().collect::<Vec<_>>();
        if values.is_empty() {
            Ok(())
        } else {
            fail(format!(
                "Expected header <{}> to not exist, but it exists with values: {:?}",
                self.0, values
            ))
        }
    }
}

#[derive(Debug)]
/// Match the value of a header using a regular expression.
/// If the header is multi-valued, all values must satisfy the regular expression.
pub struct HeaderRegexMatcher(HeaderName, Regex);

/// Shorthand for [`HeaderRegexMatcher::new`].
pub fn header_regex<K>(key: K, value: &str) -> HeaderRegexMatcher
where
    K: TryInto<HeaderName>,
    <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
{
    HeaderRegexMatcher::new(key, value)
}

impl HeaderRegexMatcher {
    pub fn new<K>(key: K, value: &str) -> Self
    where
        K: TryInto<HeaderName>,
        <K as TryInto<HeaderName>>::Error: std::fmt::Debug,
    {
        let key = key.try_into().expect("Failed to convert to header name.");
        let value_matcher = Regex::new(value).expect("Failed to create regex for value matcher");
        Self(key, value_matcher)
    }
}

impl Match for HeaderRegexMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let values = request
            .headers
            .get_all(&self.0)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>();
        if values.is_empty() {
            return fail(format!("Expected header <{}> to exist but was missing", self.0));
        }
        match values.iter().find(|v| !self.1.is_match(v)) {
            None => Ok(()),
            Some(value) => fail(format!(
                "Request header [{}] expected to match <{}> but was: <{}>",
                self.0, self.1, value
            )),
        }
    }
}

#[derive(Debug)]
/// Match the values of a query parameter, in order.
///
/// The request must carry at least as many values as expected; the first ones must equal
/// the expected values one by one.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::{query_param, query_params};
/// use mockrest::{Match, Request};
///
/// let request = Request::get("/search?tag=rust&tag=http");
///
/// assert!(query_param("tag", "rust").matches(&request).is_ok());
/// assert!(query_params("tag", vec!["rust", "http"]).matches(&request).is_ok());
/// assert!(query_param("tag", "http").matches(&request).is_err());
/// ```
pub struct QueryParamExactMatcher(String, Vec<String>);

impl QueryParamExactMatcher {
    pub fn new<K, V>(key: K, values: Vec<V>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let values = values.into_iter().map(Into::into).collect();
        Self(key, values)
    }
}

/// Shorthand for [`QueryParamExactMatcher::new`].
pub fn query_param<K, V>(key: K, value: V) -> QueryParamExactMatcher
where
    K: Into<String>,
    V: Into<String>,
{
    QueryParamExactMatcher::new(key, vec![value])
}

/// Shorthand for [`QueryParamExactMatcher::new`] supporting multi valued parameters.
pub fn query_params<K, V>(key: K, values: Vec<V>) -> QueryParamExactMatcher
where
    K: Into<String>,
    V: Into<String>,
{
    QueryParamExactMatcher::new(key, values)
}

impl Match for QueryParamExactMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let values = request
            .url
            .query_pairs()
            .filter(|(k, _)| k == self.0.as_str())
            .map(|(_, v)| v.into_owned())
            .collect::<Vec<_>>();
        if values.is_empty() {
            return fail(format!("Expected QueryParam <{}> to exist but was missing", self.0));
        }
        assert_count("QueryParam", &self.0, &values, self.1.len())?;
        self.1.iter().zip(&values).try_for_each(|(expected, actual)| {
            assert_equal(&format!("QueryParam [{}]", self.0), expected, actual)
        })
    }
}

#[derive(Debug)]
/// Only match requests that do **not** contain a specified query parameter.
pub struct QueryParamIsMissingMatcher(String);

impl QueryParamIsMissingMatcher {
    pub fn new<K: Into<String>>(key: K) -> Self {
        let key = key.into();
        Self(key)
    }
}

/// Shorthand for [`QueryParamIsMissingMatcher::new`].
pub fn query_param_is_missing<K>(key: K) -> QueryParamIsMissingMatcher
where
    K: Into<String>,
{
    QueryParamIsMissingMatcher::new(key)
}

impl Match for QueryParamIsMissingMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        if request.url.query_pairs().any(|(k, _)| k == self.0) {
            fail(format!("Expected QueryParam <{}> to be missing", self.0))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
/// Match **exactly** the body of a request.
///
/// Bodies declared from JSON values are compared structurally; a request body that is not
/// valid JSON raises [`Error::BodyConversion`] rather than a mismatch.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::body_json;
/// use mockrest::{Error, Match, Request};
/// use serde_json::json;
///
/// let matcher = body_json(json!({"hello": "world"}));
///
/// assert!(matcher.matches(&Request::post("/").body(r#"{ "hello" : "world" }"#)).is_ok());
/// assert!(matches!(
///     matcher.matches(&Request::post("/").body("hello world")),
///     Err(Error::BodyConversion(_))
/// ));
/// ```
pub struct BodyExactMatcher(Body);

#[derive(Debug)]
enum Body {
    Bytes(Vec<u8>),
    Json(Value),
}

impl BodyExactMatcher {
    /// Specify the expected body as a string.
    pub fn string<T: Into<String>>(body: T) -> Self {
        let body = body.into();
        Self(Body::Bytes(body.into_bytes()))
    }

    /// Specify the expected body as a vector of bytes.
    pub fn bytes<T: Into<Vec<u8>>>(body: T) -> Self {
        let body = body.into();
        Self(Body::Bytes(body))
    }

    /// Specify something JSON-serializable as the expected body.
    pub fn json<T: Serialize>(body: T) -> Self {
        let body = serde_json::to_value(body).expect("Failed to serialize JSON body");
        Self(Body::Json(body))
    }
}

/// Shorthand for [`BodyExactMatcher::string`].
pub fn body_string<T>(body: T) -> BodyExactMatcher
where
    T: Into<String>,
{
    BodyExactMatcher::string(body)
}

/// Shorthand for [`BodyExactMatcher::bytes`].
pub fn body_bytes<T>(body: T) -> BodyExactMatcher
where
    T: Into<Vec<u8>>,
{
    BodyExactMatcher::bytes(body)
}

/// Shorthand for [`BodyExactMatcher::json`].
pub fn body_json<T>(body: T) -> BodyExactMatcher
where
    T: Serialize,
{
    BodyExactMatcher::json(body)
}

impl Match for BodyExactMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        match &self.0 {
            Body::Bytes(bytes) if request.body == *bytes => Ok(()),
            Body::Bytes(bytes) => fail(format!(
                "Request content expected: <{}> but was: <{}>",
                String::from_utf8_lossy(bytes),
                String::from_utf8_lossy(&request.body)
            )),
            Body::Json(json) => assert_equal("Request JSON content", json, &body_as_json(request)?),
        }
    }
}

#[derive(Debug)]
/// Match part of the body of a request.
pub struct BodyContainsMatcher(String);

impl BodyContainsMatcher {
    /// Specify the part of the body that should be matched as a string.
    pub fn string<T: Into<String>>(body: T) -> Self {
        Self(body.into())
    }
}

/// Shorthand for [`BodyContainsMatcher::string`].
pub fn body_string_contains<T>(body: T) -> BodyContainsMatcher
where
    T: Into<String>,
{
    BodyContainsMatcher::string(body)
}

impl Match for BodyContainsMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        match str::from_utf8(&request.body) {
            Ok(body) if body.contains(&self.0) => Ok(()),
            Ok(body) => fail(format!(
                "Expected request content to contain <{}> but was: <{}>",
                self.0, body
            )),
            Err(err) => fail(format!(
                "Expected request content to contain <{}> but it is not valid utf-8: {}",
                self.0, err
            )),
        }
    }
}

#[derive(Debug)]
/// Match part JSON body of a request.
///
/// Every field of the expected value must be present, with the same value, in the request
/// body; extra fields in the request body are ignored.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::body_partial_json;
/// use mockrest::{Match, Request};
/// use serde_json::json;
///
/// let request = Request::post("/").body(r#"{"greeting": {"hello": "world"}, "id": 1}"#);
///
/// assert!(body_partial_json(json!({"greeting": {"hello": "world"}})).matches(&request).is_ok());
/// assert!(body_partial_json(json!({"id": 2})).matches(&request).is_err());
/// ```
pub struct BodyPartialJsonMatcher(Value);

impl BodyPartialJsonMatcher {
    /// Specify the part of the body that should be matched as a JSON value.
    pub fn json<T: Serialize>(body: T) -> Self {
        Self(serde_json::to_value(body).expect("Can't serialize to JSON"))
    }
}

/// Shorthand for [`BodyPartialJsonMatcher::json`].
pub fn body_partial_json<T: Serialize>(body: T) -> BodyPartialJsonMatcher {
    BodyPartialJsonMatcher::json(body)
}

impl Match for BodyPartialJsonMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let body = body_as_json(request)?;
        let config = assert_json_diff::Config::new(CompareMode::Inclusive);
        assert_json_matches_no_panic(&body, &self.0, config)
            .or_else(|diff| fail(format!("Request JSON content did not match:\n{}", diff)))
    }
}

#[derive(Debug)]
/// Match an `Authorization` header using HTTP Basic authentication.
pub struct BasicAuthMatcher(HeaderExactMatcher);

impl BasicAuthMatcher {
    /// Match basic authentication header using the given username and password.
    pub fn from_credentials(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self::from_token(BASE64_STANDARD.encode(format!(
            "{}:{}",
            username.as_ref(),
            password.as_ref()
        )))
    }

    /// Match basic authentication header with the exact token given.
    pub fn from_token(token: impl AsRef<str>) -> Self {
        Self(header(
            "Authorization",
            &*format!("Basic {}", token.as_ref()),
        ))
    }
}

/// Shorthand for [`BasicAuthMatcher::from_credentials`].
pub fn basic_auth<U, P>(username: U, password: P) -> BasicAuthMatcher
where
    U: AsRef<str>,
    P: AsRef<str>,
{
    BasicAuthMatcher::from_credentials(username, password)
}

impl Match for BasicAuthMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        self.0.matches(request)
    }
}

#[derive(Debug)]
/// Match an `Authorization` header using HTTP Bearer authentication.
pub struct BearerTokenMatcher(HeaderExactMatcher);

impl BearerTokenMatcher {
    pub fn from_token(token: impl AsRef<str>) -> Self {
        Self(header(
            "Authorization",
            &*format!("Bearer {}", token.as_ref()),
        ))
    }
}

impl Match for BearerTokenMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        self.0.matches(request)
    }
}

/// Shorthand for [`BearerTokenMatcher::from_token`].
pub fn bearer_token<T>(token: T) -> BearerTokenMatcher
where
    T: AsRef<str>,
{
    BearerTokenMatcher::from_token(token)
}

#[derive(Debug)]
/// Match the `Content-Type` of a request.
///
/// Type, subtype and parameter names are compared case-insensitively, parameter values as
/// they are; whitespace around `;` and quotes around parameter values are ignored.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::media_type;
/// use mockrest::{Match, Request};
///
/// let request = Request::post("/").header("content-type", "Application/JSON; charset=utf-8");
///
/// assert!(media_type("application/json;charset=utf-8").matches(&request).is_ok());
/// assert!(media_type("application/json").matches(&request).is_err());
/// ```
pub struct MediaTypeMatcher(String);

impl MediaTypeMatcher {
    pub fn new<T: AsRef<str>>(media_type: T) -> Self {
        Self(normalize_media_type(media_type.as_ref()))
    }
}

/// Shorthand for [`MediaTypeMatcher::new`].
pub fn media_type<T>(media_type: T) -> MediaTypeMatcher
where
    T: AsRef<str>,
{
    MediaTypeMatcher::new(media_type)
}

fn normalize_media_type(raw: &str) -> String {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(i, part)| match part.split_once('=') {
            Some((name, value)) if i > 0 => format!(
                "{}={}",
                name.trim().to_ascii_lowercase(),
                value.trim().trim_matches('"')
            ),
            _ => part.to_ascii_lowercase(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

impl Match for MediaTypeMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let actual = match request.headers.get(http::header::CONTENT_TYPE) {
            Some(value) => normalize_media_type(&String::from_utf8_lossy(value.as_bytes())),
            None => return fail("MediaType was not set.".to_string()),
        };
        assert_equal("MediaType", self.0.as_str(), actual.as_str())
    }
}

fn form_fields<I, K, V>(fields: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut form = BTreeMap::<String, Vec<String>>::new();
    for (name, value) in fields {
        form.entry(name.into()).or_default().push(value.into());
    }
    form
}

fn body_as_form(request: &Request) -> Result<BTreeMap<String, Vec<String>>, Error> {
    let body = str::from_utf8(&request.body).map_err(|e| Error::BodyConversion(e.into()))?;
    Ok(form_fields(
        form_urlencoded::parse(body.as_bytes()).into_owned(),
    ))
}

#[derive(Debug)]
/// Match a `application/x-www-form-urlencoded` body **exactly**.
///
/// Field order across names does not matter; values of the same field are compared in
/// order. A body that is not valid UTF-8 raises [`Error::BodyConversion`].
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::{form, form_contains};
/// use mockrest::{Match, Request};
///
/// let request = Request::post("/login").body("user=ferris&lang=en&lang=it");
///
/// assert!(form([("lang", "en"), ("user", "ferris"), ("lang", "it")]).matches(&request).is_ok());
/// assert!(form([("user", "ferris")]).matches(&request).is_err());
/// assert!(form_contains([("user", "ferris")]).matches(&request).is_ok());
/// ```
pub struct FormMatcher(BTreeMap<String, Vec<String>>);

impl FormMatcher {
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(form_fields(fields))
    }
}

/// Shorthand for [`FormMatcher::new`].
pub fn form<I, K, V>(fields: I) -> FormMatcher
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    FormMatcher::new(fields)
}

impl Match for FormMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let actual = body_as_form(request)?;
        if actual == self.0 {
            Ok(())
        } else {
            fail(format!("Form expected: <{:?}> but was: <{:?}>", self.0, actual))
        }
    }
}

#[derive(Debug)]
/// Match a `application/x-www-form-urlencoded` body containing **at least** the given fields.
///
/// Every expected value must be among the values of its field; extra fields and values are
/// ignored.
pub struct FormContainsMatcher(BTreeMap<String, Vec<String>>);

impl FormContainsMatcher {
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(form_fields(fields))
    }
}

/// Shorthand for [`FormContainsMatcher::new`].
pub fn form_contains<I, K, V>(fields: I) -> FormContainsMatcher
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    FormContainsMatcher::new(fields)
}

impl Match for FormContainsMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let actual = body_as_form(request)?;
        if self.0.len() > actual.len() {
            return fail(format!(
                "Expected {:?} to be smaller or the same size as {:?}",
                self.0, actual
            ));
        }
        for (name, values) in &self.0 {
            let actual_values = match actual.get(name) {
                Some(actual_values) => actual_values,
                None => {
                    return fail(format!(
                        "Expected {:?} to contain parameter '{}'",
                        actual, name
                    ))
                }
            };
            if values.len() > actual_values.len() {
                return fail(format!(
                    "Expected {:?} to be smaller or the same size as {:?}",
                    values, actual_values
                ));
            }
            if !values.iter().all(|value| actual_values.contains(value)) {
                return fail(format!(
                    "Expected {:?} to be a subset of {:?}",
                    values, actual_values
                ));
            }
        }
        Ok(())
    }
}

/// Builds matchers on the value found at a [JSON pointer] in the request body.
///
/// Every matcher built here raises [`Error::BodyConversion`] if the body is not JSON.
///
/// ### Example:
/// ```rust
/// use mockrest::matchers::json_path;
/// use mockrest::{Match, Request};
/// use serde_json::json;
///
/// let request = Request::post("/").json(&json!({"user": {"name": "ferris", "tags": []}}));
///
/// assert!(json_path("/user/name").value("ferris").matches(&request).is_ok());
/// assert!(json_path("/user/tags").is_array().matches(&request).is_ok());
/// assert!(json_path("/user/id").does_not_exist().matches(&request).is_ok());
/// assert!(json_path("/user/id").exists().matches(&request).is_err());
/// ```
///
/// [JSON pointer]: https://datatracker.ietf.org/doc/html/rfc6901
#[derive(Clone, Debug)]
pub struct JsonPathMatchers(String);

/// Shorthand for [`JsonPathMatchers::new`].
pub fn json_path<T>(pointer: T) -> JsonPathMatchers
where
    T: Into<String>,
{
    JsonPathMatchers::new(pointer)
}

impl JsonPathMatchers {
    /// # Panics
    /// If `pointer` is neither empty nor starts with `/`.
    pub fn new<T: Into<String>>(pointer: T) -> Self {
        let pointer = pointer.into();
        if !pointer.is_empty() && !pointer.starts_with('/') {
            panic!(
                "mockrest can't use `{}` as a JSON pointer: it must be empty or start with `/`, e.g. `/{}`",
                pointer, pointer
            );
        }
        Self(pointer)
    }

    fn matcher(&self, check: JsonPathCheck) -> JsonPathMatcher {
        JsonPathMatcher {
            pointer: self.0.clone(),
            check,
        }
    }

    /// The value must be present and equal to `expected`.
    pub fn value<T: Serialize>(&self, expected: T) -> JsonPathMatcher {
        let expected = serde_json::to_value(expected).expect("Can't serialize to JSON");
        self.matcher(JsonPathCheck::Value(expected))
    }

    /// The value must be present and not `null`.
    pub fn exists(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::Exists)
    }

    /// The value must be absent or `null`.
    pub fn does_not_exist(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::DoesNotExist)
    }

    /// The pointer must resolve, even to `null`.
    pub fn has_json_path(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::HasJsonPath)
    }

    /// The pointer must not resolve.
    pub fn does_not_have_json_path(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::DoesNotHaveJsonPath)
    }

    pub fn is_string(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::Kind(JsonKind::String))
    }

    pub fn is_boolean(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::Kind(JsonKind::Boolean))
    }

    pub fn is_number(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::Kind(JsonKind::Number))
    }

    pub fn is_array(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::Kind(JsonKind::Array))
    }

    pub fn is_map(&self) -> JsonPathMatcher {
        self.matcher(JsonPathCheck::Kind(JsonKind::Map))
    }
}

#[derive(Debug)]
enum JsonPathCheck {
    Value(Value),
    Exists,
    DoesNotExist,
    HasJsonPath,
    DoesNotHaveJsonPath,
    Kind(JsonKind),
}

#[derive(Clone, Copy, Debug)]
enum JsonKind {
    String,
    Boolean,
    Number,
    Array,
    Map,
}

impl JsonKind {
    fn description(self) -> &'static str {
        match self {
            JsonKind::String => "a string",
            JsonKind::Boolean => "a boolean",
            JsonKind::Number => "a number",
            JsonKind::Array => "an array",
            JsonKind::Map => "a map",
        }
    }

    fn is_kind_of(self, value: &Value) -> bool {
        match self {
            JsonKind::String => value.is_string(),
            JsonKind::Boolean => value.is_boolean(),
            JsonKind::Number => value.is_number(),
            JsonKind::Array => value.is_array(),
            JsonKind::Map => value.is_object(),
        }
    }
}

#[derive(Debug)]
/// A check on the value found at a JSON pointer. Built with [`json_path`].
pub struct JsonPathMatcher {
    pointer: String,
    check: JsonPathCheck,
}

impl JsonPathMatcher {
    fn no_value<T>(&self) -> Result<T, Error> {
        fail(format!("Found no value for JSON path \"{}\"", self.pointer))
    }

    fn found<T>(&self, description: &str, value: &Value) -> Result<T, Error> {
        let value = match value {
            Value::String(s) => format!("'{}'", s),
            other => other.to_string(),
        };
        fail(format!(
            "Expected {} at JSON Path \"{}\" but found {}",
            description, self.pointer, value
        ))
    }
}

impl Match for JsonPathMatcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        let body = body_as_json(request)?;
        let found = body.pointer(&self.pointer);
        match (&self.check, found) {
            (JsonPathCheck::Value(_), None) => self.no_value(),
            (JsonPathCheck::Value(expected), Some(actual)) => assert_equal(
                &format!("JSON Path \"{}\"", self.pointer),
                expected,
                actual,
            ),
            (JsonPathCheck::Exists, Some(value)) if !value.is_null() => Ok(()),
            (JsonPathCheck::Exists, _) => self.no_value(),
            (JsonPathCheck::DoesNotExist, None | Some(Value::Null)) => Ok(()),
            (JsonPathCheck::DoesNotExist, Some(value)) => self.found("no value", value),
            (JsonPathCheck::HasJsonPath, Some(_)) => Ok(()),
            (JsonPathCheck::HasJsonPath, None) => self.no_value(),
            (JsonPathCheck::DoesNotHaveJsonPath, None) => Ok(()),
            (JsonPathCheck::DoesNotHaveJsonPath, Some(value)) => self.found("no value", value),
            (JsonPathCheck::Kind(_), None | Some(Value::Null)) => self.no_value(),
            (JsonPathCheck::Kind(kind), Some(value)) => {
                if kind.is_kind_of(value) {
                    Ok(())
                } else {
                    self.found(kind.description(), value)
                }
            }
        }
    }
}

//! Shorthands for the responses tests reach for most often.
//!
//! Every function returns a [`ResponseTemplate`] that can be customised further before being
//! handed to [`ResponseActions::and_respond`], except [`with_error`] which simulates a
//! transport failure.
//!
//! [`ResponseActions::and_respond`]: crate::ResponseActions::and_respond
use crate::{Error, Request, Respond, Response, ResponseTemplate};
use http::header::{LOCATION, RETRY_AFTER};
use http::StatusCode;
use std::io;

/// `200 OK` without a body.
pub fn with_success() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::OK)
}

/// `200 OK` with a body of the given media type.
pub fn with_success_body<B: Into<Vec<u8>>>(body: B, mime: &str) -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::OK).set_body_raw(body, mime)
}

/// `201 Created` pointing at `location`.
pub fn with_created(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::CREATED).insert_header(LOCATION, location)
}

pub fn with_accepted() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::ACCEPTED)
}

pub fn with_no_content() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::NO_CONTENT)
}

pub fn with_bad_request() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::BAD_REQUEST)
}

pub fn with_unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::UNAUTHORIZED)
}

pub fn with_forbidden() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::FORBIDDEN)
}

pub fn with_not_found() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::NOT_FOUND)
}

pub fn with_conflict() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::CONFLICT)
}

pub fn with_too_many_requests() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::TOO_MANY_REQUESTS)
}

/// `429 Too Many Requests` with a `Retry-After` header, in seconds.
pub fn with_too_many_requests_retry_after(seconds: u64) -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(RETRY_AFTER, seconds.to_string())
}

pub fn with_internal_server_error() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn with_service_unavailable() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE)
}

pub fn with_gateway_timeout() -> ResponseTemplate {
    ResponseTemplate::new(StatusCode::GATEWAY_TIMEOUT)
}

/// Any status code, including ones without a registered reason phrase.
///
/// # Panics
/// If `status` is outside `100..=999`.
pub fn with_status(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status)
}

/// Fail every matching request with a transport error built from `error`.
///
/// ```rust
/// use mockrest::matchers::any;
/// use mockrest::responses::with_error;
/// use mockrest::{Error, ExpectationManager, ExpectedCount, Request};
/// use std::io;
///
/// let manager = ExpectationManager::default();
/// manager
///     .expect_request(ExpectedCount::once(), any())
///     .and_respond(with_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset")));
///
/// let outcome = manager.validate_request(&Request::get("/"));
/// assert!(matches!(outcome, Err(Error::Transport(e)) if e.kind() == io::ErrorKind::ConnectionReset));
/// ```
pub fn with_error(error: io::Error) -> TransportError {
    TransportError {
        kind: error.kind(),
        message: error.to_string(),
    }
}

/// A responder that simulates a failed network round trip. See [`with_error`].
#[derive(Clone, Debug)]
pub struct TransportError {
    kind: io::ErrorKind,
    message: String,
}

impl Respond for TransportError {
    fn respond(&self, _request: &Request) -> Result<Response, Error> {
        // `io::Error` is not `Clone`: rebuild it for every invocation.
        Err(Error::Transport(io::Error::new(
            self.kind,
            self.message.clone(),
        )))
    }
}

use crate::{Error, Request, Response, ResponseTemplate};

/// Anything that implements `Respond` can be used to answer a request once a declared
/// expectation has matched it.
///
/// ## Fixed responses
///
/// The simplest `Respond` is [`ResponseTemplate`]: no matter the request, it will
/// always return a copy of itself.
///
/// ## Dynamic responses
///
/// Closures taking a `&Request` and returning a `Result<Response, Error>` implement `Respond`
/// as well. You could, for example, propagate back a request header in the response:
///
/// ```rust
/// use mockrest::matchers::path;
/// use mockrest::{Error, ExpectationManager, ExpectedCount, Request, Response, ResponseTemplate};
///
/// let manager = ExpectationManager::default();
/// manager
///     .expect_request(ExpectedCount::once(), path("/hello"))
///     .and_respond(|request: &Request| -> Result<Response, Error> {
///         let mut template = ResponseTemplate::new(200);
///         if let Some(id) = request.headers.get("X-Correlation-Id") {
///             template = template.insert_header("X-Correlation-Id", id.clone());
///         }
///         Ok(template.generate_response())
///     });
///
/// let response = manager
///     .validate_request(&Request::get("/hello").header("X-Correlation-Id", "1241-1245"))
///     .unwrap();
/// assert_eq!(response.headers()["X-Correlation-Id"], "1241-1245");
/// ```
///
/// ## Failures
///
/// Returning an error simulates a failed round trip: the error is handed back, unchanged,
/// to the caller of [`validate_request`]. See [`with_error`] for a ready-made transport
/// failure.
///
/// [`validate_request`]: crate::ExpectationManager::validate_request
/// [`with_error`]: crate::responses::with_error
pub trait Respond: Send + Sync {
    /// Given a reference to a [`Request`] return the [`Response`] handed back to the client.
    fn respond(&self, request: &Request) -> Result<Response, Error>;
}

impl Respond for ResponseTemplate {
    fn respond(&self, _request: &Request) -> Result<Response, Error> {
        Ok(self.generate_response())
    }
}

impl<F> Respond for F
where
    F: Fn(&Request) -> Result<Response, Error>,
    F: Send + Sync,
{
    fn respond(&self, request: &Request) -> Result<Response, Error> {
        self(request)
    }
}

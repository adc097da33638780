use crate::{Error, Request};
use std::fmt::{Debug, Formatter};

/// Anything that implements `Match` can be used to constrain which requests satisfy a declared
/// expectation.
///
/// Unlike a plain predicate, `matches` explains itself: a request that does not match
/// yields [`Error::Mismatch`] with a human readable description of what was expected and
/// what was received. That description ends up in the error returned to the code under
/// test and in the verification report.
///
/// Any other error (e.g. [`Error::BodyConversion`]) is treated as fatal by the ordering
/// strategies: it is never skipped over in favour of another candidate.
///
/// ```rust
/// use mockrest::{Error, Match, Request};
///
/// // Check that a header with the specified name exists and its value has an odd length.
/// pub struct OddHeaderMatcher(http::HeaderName);
///
/// impl Match for OddHeaderMatcher {
///     fn matches(&self, request: &Request) -> Result<(), Error> {
///         match request.headers.get(&self.0) {
///             Some(value) if value.len() % 2 == 1 => Ok(()),
///             Some(value) => Err(Error::Mismatch(format!(
///                 "Expected header <{}> to have an odd length but was: <{:?}>",
///                 self.0, value
///             ))),
///             None => Err(Error::Mismatch(format!("Expected header <{}> to exist", self.0))),
///         }
///     }
/// }
///
/// let matcher = OddHeaderMatcher(http::HeaderName::from_static("custom"));
/// assert!(matcher.matches(&Request::get("/").header("custom", "odd")).is_ok());
/// assert!(matcher.matches(&Request::get("/").header("custom", "even")).is_err());
/// ```
///
/// Closures taking a `&Request` and returning a `bool` are matchers too; they report a
/// generic mismatch message.
pub trait Match: Send + Sync {
    /// `Ok(())` if the request satisfies the matcher, an error describing why not otherwise.
    fn matches(&self, request: &Request) -> Result<(), Error>;
}

/// Implement the `Match` trait for all closures, out of the box,
/// if their signature is compatible.
impl<F> Match for F
where
    F: Fn(&Request) -> bool,
    F: Send + Sync,
{
    fn matches(&self, request: &Request) -> Result<(), Error> {
        if self(request) {
            Ok(())
        } else {
            Err(Error::Mismatch(format!(
                "Request did not satisfy a custom matcher: {}",
                request
            )))
        }
    }
}

pub(crate) struct Matcher(Box<dyn Match>);

impl Matcher {
    pub(crate) fn new<M: Match + 'static>(matcher: M) -> Self {
        Self(Box::new(matcher))
    }
}

impl Match for Matcher {
    fn matches(&self, request: &Request) -> Result<(), Error> {
        self.0.matches(request)
    }
}

impl Debug for Matcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Closures do not implement `Debug`.
        f.write_str("Matcher")
    }
}

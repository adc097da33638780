use crate::mock::Matcher;
use crate::{Error, ExpectationManager, ExpectedCount, Match, Request, Respond, Response};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A single declared expectation: how many times it may match, which matchers a request must
/// satisfy and how to answer it.
///
/// Expectations are owned by an [`ExpectationManager`]; tests shape them through the
/// [`ResponseActions`] handle returned by [`ExpectationManager::expect_request`].
pub(crate) struct Expectation {
    expected_count: ExpectedCount,
    matchers: Vec<Matcher>,
    matched_count: u64,
    responder: Option<Arc<dyn Respond>>,
}

impl Expectation {
    pub(crate) fn new(expected_count: ExpectedCount, matcher: Matcher) -> Self {
        Self {
            expected_count,
            matchers: vec![matcher],
            matched_count: 0,
            responder: None,
        }
    }

    /// Run every matcher in declaration order, stopping at the first one that fails.
    ///
    /// It never touches `matched_count`: strategies confirm a match with
    /// `increment_and_validate`.
    pub(crate) fn matches(&self, request: &Request) -> Result<(), Error> {
        self.matchers
            .iter()
            .try_for_each(|matcher| matcher.matches(request))
    }

    pub(crate) fn and_expect(&mut self, matcher: Matcher) {
        self.matchers.push(matcher);
    }

    pub(crate) fn and_respond(&mut self, responder: Arc<dyn Respond>) {
        self.responder = Some(responder);
    }

    pub(crate) fn is_satisfied(&self) -> bool {
        self.matched_count >= self.expected_count.min()
    }

    pub(crate) fn has_remaining_count(&self) -> bool {
        self.matched_count < self.expected_count.max()
    }

    /// Record a confirmed match, failing if it pushes the count past the upper bound.
    pub(crate) fn increment_and_validate(&mut self) -> Result<(), Error> {
        self.matched_count += 1;
        if self.matched_count > self.expected_count.max() {
            return Err(Error::TooManyCalls);
        }
        Ok(())
    }

    /// Capture what is needed to answer a request so that the answer can be produced after
    /// the manager lock has been released.
    pub(crate) fn response_producer(&self) -> ResponseProducer {
        ResponseProducer(self.responder.clone())
    }

    pub(crate) fn matched_count(&self) -> u64 {
        self.matched_count
    }

    pub(crate) fn expected_count(&self) -> ExpectedCount {
        self.expected_count
    }
}

impl Debug for Expectation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("expected_count", &self.expected_count)
            .field("matchers", &self.matchers.len())
            .field("matched_count", &self.matched_count)
            .field("has_responder", &self.responder.is_some())
            .finish()
    }
}

/// The responder bound to an expectation at the time it matched.
pub(crate) struct ResponseProducer(Option<Arc<dyn Respond>>);

impl ResponseProducer {
    pub(crate) fn create_response(&self, request: &Request) -> Result<Response, Error> {
        match &self.0 {
            Some(responder) => responder.respond(request),
            None => Err(Error::NoResponder),
        }
    }
}

/// Handle to an expectation that has just been declared, used to add matchers and to bind
/// the responder.
///
/// ```rust
/// use mockrest::matchers::{header, method, path};
/// use mockrest::{ExpectationManager, ExpectedCount, Request, ResponseTemplate};
///
/// let manager = ExpectationManager::default();
/// manager
///     .expect_request(ExpectedCount::times(2), method("GET"))
///     .and_expect(path("/hello"))
///     .and_expect(header("accept", "text/plain"))
///     .and_respond(ResponseTemplate::new(200).set_body_string("world"));
///
/// let request = Request::get("/hello").header("accept", "text/plain");
/// assert_eq!(manager.validate_request(&request).unwrap().body(), b"world");
/// ```
///
/// A handle belongs to one declaration cycle: after [`ExpectationManager::reset`] it no
/// longer refers to anything and using it only logs a warning.
#[must_use = "an expectation without a responder fails every request it matches"]
pub struct ResponseActions<'a> {
    manager: &'a ExpectationManager,
    index: usize,
    generation: u64,
}

impl<'a> ResponseActions<'a> {
    pub(crate) fn new(manager: &'a ExpectationManager, index: usize, generation: u64) -> Self {
        Self {
            manager,
            index,
            generation,
        }
    }

    /// Require requests to also satisfy `matcher`.
    pub fn and_expect<M: Match + 'static>(self, matcher: M) -> Self {
        let matcher = Matcher::new(matcher);
        self.manager
            .update_expectation(self.index, self.generation, |expectation| {
                expectation.and_expect(matcher)
            });
        self
    }

    /// Bind the responder used to answer matching requests.
    ///
    /// It consumes the handle: an expectation has exactly one responder.
    pub fn and_respond<R: Respond + 'static>(self, responder: R) {
        let responder: Arc<dyn Respond> = Arc::new(responder);
        self.manager
            .update_expectation(self.index, self.generation, |expectation| {
                expectation.and_respond(responder)
            });
    }
}

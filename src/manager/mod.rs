mod group;
mod grouped;
mod strategy;
mod strict;
mod unordered;

use crate::expectation::Expectation;
use crate::mock::Matcher;
use crate::verification::{self, FailedRequest, VerificationOutcome};
use crate::{Error, ExpectedCount, Match, Request, Response, ResponseActions};
use grouped::GroupedOrder;
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use strategy::OrderingStrategy;
use strict::StrictOrder;
use unordered::UnorderedOrder;

/// Sleep between two checks of [`ExpectationManager::verify_timeout`], unless overridden.
///
/// Read once from `MOCKREST_VERIFY_POLL_INTERVAL_MS`, defaulting to 10 milliseconds.
pub(crate) static DEFAULT_POLL_INTERVAL: Lazy<Duration> = Lazy::new(|| {
    env::var("MOCKREST_VERIFY_POLL_INTERVAL_MS")
        .ok()
        .and_then(|x| x.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(10))
});

/// How requests are allowed to interleave with respect to the order in which expectations
/// were declared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestOrder {
    /// Every expectation that has not reached its minimum must be matched in declaration
    /// order. Satisfied expectations may match again, as long as they come first.
    Strict,
    /// First occurrences follow declaration order; an expectation that already matched may
    /// match again at any time while it has remaining count.
    #[default]
    Grouped,
    /// Declaration order is ignored.
    Unordered,
}

impl RequestOrder {
    fn strategy(self) -> Box<dyn OrderingStrategy> {
        match self {
            RequestOrder::Strict => Box::new(StrictOrder),
            RequestOrder::Grouped => Box::new(GroupedOrder::default()),
            RequestOrder::Unordered => Box::new(UnorderedOrder::default()),
        }
    }
}

struct ManagerState {
    expectations: Vec<Expectation>,
    requests: Vec<Request>,
    failed_requests: Vec<FailedRequest>,
    strategy: Box<dyn OrderingStrategy>,
    /// Bumped on every reset, so that stale `ResponseActions` can be told apart.
    generation: u64,
}

impl ManagerState {
    fn match_request(&mut self, request: &Request) -> Result<usize, Error> {
        let ManagerState {
            expectations,
            requests,
            strategy,
            ..
        } = self;
        match strategy.match_request(expectations, request)? {
            Some(index) => Ok(index),
            None => {
                debug!("Got unexpected request:\n{}", request);
                Err(verification::unexpected_request(request, requests))
            }
        }
    }

    fn outcome(&self) -> VerificationOutcome {
        if !self.failed_requests.is_empty() {
            return VerificationOutcome::Failed(verification::failed_requests(
                &self.failed_requests,
            ));
        }
        let unsatisfied = self
            .expectations
            .iter()
            .filter(|expectation| !expectation.is_satisfied())
            .count();
        if unsatisfied == 0 {
            VerificationOutcome::Success
        } else {
            VerificationOutcome::Pending(unsatisfied)
        }
    }
}

/// Owns the declared expectations and matches every outgoing request against them.
///
/// This is the engine behind [`MockRestServer`]: the HTTP layer hands each intercepted request
/// to [`validate_request`] and sends back whatever it returns, while the test declares
/// expectations upfront with [`expect_request`] and checks them afterwards with [`verify`].
///
/// ```rust
/// use mockrest::matchers::{method, request_to};
/// use mockrest::{Error, ExpectationManager, ExpectedCount, Request, ResponseTemplate};
///
/// let manager = ExpectationManager::default();
/// manager
///     .expect_request(ExpectedCount::once(), request_to("/hello"))
///     .and_expect(method("GET"))
///     .and_respond(ResponseTemplate::new(200));
/// manager
///     .expect_request(ExpectedCount::once(), request_to("/goodbye"))
///     .and_respond(ResponseTemplate::new(200));
///
/// assert_eq!(manager.validate_request(&Request::get("/hello")).unwrap().status(), 200);
/// assert_eq!(manager.validate_request(&Request::get("/goodbye")).unwrap().status(), 200);
/// assert!(manager.verify().is_ok());
///
/// // Nothing else was declared.
/// assert!(matches!(
///     manager.validate_request(&Request::get("/anything")),
///     Err(Error::UnexpectedRequest(_))
/// ));
/// assert!(matches!(manager.verify(), Err(Error::FailedRequests(_))));
/// ```
///
/// All state sits behind a single lock: concurrent requests are matched one at a time, in a
/// well defined (if non-deterministic) order. Responses are produced after the lock has been
/// released.
///
/// [`MockRestServer`]: crate::MockRestServer
/// [`validate_request`]: ExpectationManager::validate_request
/// [`expect_request`]: ExpectationManager::expect_request
/// [`verify`]: ExpectationManager::verify
pub struct ExpectationManager {
    state: Mutex<ManagerState>,
    order: RequestOrder,
    poll_interval: Duration,
}

impl Default for ExpectationManager {
    fn default() -> Self {
        Self::new(RequestOrder::default())
    }
}

impl ExpectationManager {
    pub fn new(order: RequestOrder) -> Self {
        Self::with_poll_interval(order, *DEFAULT_POLL_INTERVAL)
    }

    /// Like [`ExpectationManager::new`], with a custom sleep between the checks performed
    /// by [`ExpectationManager::verify_timeout`].
    pub fn with_poll_interval(order: RequestOrder, poll_interval: Duration) -> Self {
        Self {
            state: Mutex::new(ManagerState {
                expectations: Vec::new(),
                requests: Vec::new(),
                failed_requests: Vec::new(),
                strategy: order.strategy(),
                generation: 0,
            }),
            order,
            poll_interval,
        }
    }

    pub fn order(&self) -> RequestOrder {
        self.order
    }

    // A matcher panicking while the lock is held must not take the manager down with it.
    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Declare that `count` requests satisfying `matcher` are expected.
    ///
    /// The returned handle adds matchers and binds the responder.
    pub fn expect_request<M: Match + 'static>(
        &self,
        count: ExpectedCount,
        matcher: M,
    ) -> ResponseActions<'_> {
        let mut state = self.lock();
        state
            .expectations
            .push(Expectation::new(count, Matcher::new(matcher)));
        debug!("Registered expectation #{} ({}).", state.expectations.len() - 1, count);
        ResponseActions::new(self, state.expectations.len() - 1, state.generation)
    }

    pub(crate) fn update_expectation<F>(&self, index: usize, generation: u64, f: F)
    where
        F: FnOnce(&mut Expectation),
    {
        let mut state = self.lock();
        if state.generation != generation {
            warn!("Ignoring an update to an expectation declared before the last reset.");
            return;
        }
        if let Some(expectation) = state.expectations.get_mut(index) {
            f(expectation);
        }
    }

    /// Match `request` against the declared expectations and produce its response.
    ///
    /// An error raised while matching is returned to the caller *and* remembered, so that a
    /// later [`verify`](ExpectationManager::verify) fails too. Errors raised by the responder
    /// are only returned.
    pub fn validate_request(&self, request: &Request) -> Result<Response, Error> {
        debug!("Handling request: {}", request);
        let producer = {
            let mut state = self.lock();
            if state.requests.is_empty() {
                let ManagerState {
                    expectations,
                    strategy,
                    ..
                } = &mut *state;
                strategy.expectations_declared(expectations);
            }

            let outcome = state.match_request(request);
            state.requests.push(request.clone());
            match outcome {
                Ok(index) => state.expectations[index].response_producer(),
                Err(error) => {
                    state.failed_requests.push(FailedRequest {
                        request: request.clone(),
                        error: error.to_string(),
                    });
                    return Err(error);
                }
            }
        };
        producer.create_response(request)
    }

    /// Check that every declared expectation reached its minimum and that no request failed
    /// to match.
    pub fn verify(&self) -> Result<(), Error> {
        debug!("Verify expectations.");
        let state = self.lock();
        match state.outcome() {
            VerificationOutcome::Success => Ok(()),
            VerificationOutcome::Pending(unsatisfied) => {
                for (index, expectation) in state.expectations.iter().enumerate() {
                    if !expectation.is_satisfied() {
                        debug!(
                            "Expectation #{} matched {} time(s), expected {}.",
                            index,
                            expectation.matched_count(),
                            expectation.expected_count()
                        );
                    }
                }
                Err(verification::unsatisfied(unsatisfied, &state.requests))
            }
            VerificationOutcome::Failed(error) => Err(error),
        }
    }

    /// Like [`verify`](ExpectationManager::verify), but give pending expectations up to
    /// `timeout` to be satisfied by requests issued from other threads.
    ///
    /// Returns as soon as every expectation is satisfied; a failed request fails it right
    /// away.
    pub fn verify_timeout(&self, timeout: Duration) -> Result<(), Error> {
        // `None` if the timeout is too large to be represented: wait until satisfied.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            // The lock is only held for the duration of a single check.
            let outcome = self.lock().outcome();
            match outcome {
                VerificationOutcome::Success => return Ok(()),
                VerificationOutcome::Failed(error) => return Err(error),
                VerificationOutcome::Pending(_) => {}
            }
            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    self.poll_interval.min(deadline - now)
                }
                None => self.poll_interval,
            };
            thread::sleep(pause);
        }
        self.verify()
    }

    /// Drop all expectations and forget every request seen so far.
    pub fn reset(&self) {
        debug!("Dropping all expectations.");
        let mut state = self.lock();
        state.expectations.clear();
        state.requests.clear();
        state.failed_requests.clear();
        state.strategy.reset();
        state.generation += 1;
    }

    /// Every request handled since the last reset, in arrival order.
    pub fn received_requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// Requests that failed to match since the last reset, with their error.
    pub fn failed_requests(&self) -> Vec<FailedRequest> {
        self.lock().failed_requests.clone()
    }
}

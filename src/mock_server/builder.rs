use crate::manager::DEFAULT_POLL_INTERVAL;
use crate::{ExpectationManager, MockClient, MockRestServer, RequestOrder};
use std::sync::Arc;
use std::time::Duration;

/// A builder providing a fluent API to assemble a [`MockRestServer`] step-by-step.
/// Use [`MockRestServer::bind_to`] to get started.
///
/// The builder can be reused: every call to [`build`](MockRestServerBuilder::build) creates a
/// fresh server and rebinds the client to it.
#[derive(Clone)]
pub struct MockRestServerBuilder {
    client: MockClient,
    order: RequestOrder,
    poll_interval: Duration,
    verify_on_drop: bool,
}

impl MockRestServerBuilder {
    pub(super) fn new(client: &MockClient) -> Self {
        Self {
            client: client.clone(),
            order: RequestOrder::default(),
            poll_interval: *DEFAULT_POLL_INTERVAL,
            verify_on_drop: true,
        }
    }

    /// Accept requests in any order instead of declaration order.
    ///
    /// `false` goes back to the default, [`RequestOrder::Grouped`].
    pub fn ignore_request_order(mut self, ignore_request_order: bool) -> Self {
        self.order = if ignore_request_order {
            RequestOrder::Unordered
        } else {
            RequestOrder::Grouped
        };
        self
    }

    /// Pick the ordering discipline explicitly. See [`RequestOrder`].
    pub fn request_order(mut self, order: RequestOrder) -> Self {
        self.order = order;
        self
    }

    /// How long [`MockRestServer::verify_timeout`] sleeps between two checks.
    ///
    /// Defaults to 10 milliseconds, or to `MOCKREST_VERIFY_POLL_INTERVAL_MS` if set.
    pub fn verify_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// By default, expectations are verified when the [`MockRestServer`] goes out of scope
    /// and a failed verification panics.
    ///
    /// Pass `false` to only verify when [`MockRestServer::verify`] is called explicitly.
    pub fn verify_on_drop(mut self, verify_on_drop: bool) -> Self {
        self.verify_on_drop = verify_on_drop;
        self
    }

    /// Create the server and bind the client to it.
    pub fn build(&self) -> MockRestServer {
        let manager = Arc::new(ExpectationManager::with_poll_interval(
            self.order,
            self.poll_interval,
        ));
        self.client.bind(manager.clone());
        MockRestServer::new(manager, self.verify_on_drop)
    }
}

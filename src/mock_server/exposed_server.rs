use crate::mock_server::MockRestServerBuilder;
use crate::{
    ExpectationManager, ExpectedCount, Match, MockClient, Request, RequestOrder, ResponseActions,
};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// The test-facing handle to declare expected requests and verify that they happened.
///
/// ```rust
/// use mockrest::matchers::request_to;
/// use mockrest::responses::with_success;
/// use mockrest::{MockClient, MockRestServer};
///
/// // Arrange
/// let client = MockClient::new();
/// let server = MockRestServer::bind_to(&client).build();
/// server.expect(request_to("/hello")).and_respond(with_success());
/// server.expect(request_to("/goodbye")).and_respond(with_success());
///
/// // Act - this is what the component under test would do
/// assert_eq!(client.get("/hello").unwrap().status(), 200);
/// assert_eq!(client.get("/goodbye").unwrap().status(), 200);
///
/// // Assert
/// server.verify();
/// ```
///
/// Verification failures panic, as any other test assertion.
/// Expectations are also verified when a `MockRestServer` goes out of scope, unless
/// disabled with [`MockRestServerBuilder::verify_on_drop`].
pub struct MockRestServer {
    manager: Arc<ExpectationManager>,
    verify_on_drop: bool,
}

impl MockRestServer {
    pub(super) fn new(manager: Arc<ExpectationManager>, verify_on_drop: bool) -> Self {
        Self {
            manager,
            verify_on_drop,
        }
    }

    /// Start building a server that answers the requests issued through `client`.
    pub fn bind_to(client: &MockClient) -> MockRestServerBuilder {
        MockRestServerBuilder::new(client)
    }

    /// Expect exactly one request satisfying `matcher`.
    pub fn expect<M: Match + 'static>(&self, matcher: M) -> ResponseActions<'_> {
        self.expect_count(ExpectedCount::once(), matcher)
    }

    /// Expect `count` requests satisfying `matcher`.
    pub fn expect_count<M: Match + 'static>(
        &self,
        count: ExpectedCount,
        matcher: M,
    ) -> ResponseActions<'_> {
        self.manager.expect_request(count, matcher)
    }

    /// Verify that all expected requests were issued and that none failed.
    ///
    /// # Panics
    /// With a message listing what went wrong and the requests received so far.
    pub fn verify(&self) {
        if let Err(e) = self.manager.verify() {
            panic!("{}", e);
        }
    }

    /// Like [`verify`](MockRestServer::verify), giving requests issued concurrently up to
    /// `timeout` to arrive.
    ///
    /// # Panics
    /// If expectations are still unsatisfied once `timeout` has elapsed.
    pub fn verify_timeout(&self, timeout: Duration) {
        if let Err(e) = self.manager.verify_timeout(timeout) {
            panic!("{}", e);
        }
    }

    /// Drop all expectations and recorded requests, to start over with the same client.
    pub fn reset(&self) {
        self.manager.reset();
    }

    /// Every request issued since the server was built or last reset.
    pub fn received_requests(&self) -> Vec<Request> {
        self.manager.received_requests()
    }

    pub fn request_order(&self) -> RequestOrder {
        self.manager.order()
    }

    /// The engine behind this server, for non-panicking verification.
    pub fn manager(&self) -> &ExpectationManager {
        &self.manager
    }
}

impl Drop for MockRestServer {
    fn drop(&mut self) {
        if !self.verify_on_drop {
            return;
        }
        debug!("Verify expectations on drop.");
        if let Err(e) = self.manager.verify() {
            if std::thread::panicking() {
                debug!("{}", e);
            } else {
                panic!("{}", e);
            }
        }
    }
}

use crate::{Error, ExpectationManager, Request, Response};
use log::debug;
use std::sync::{Arc, PoisonError, RwLock};

/// The interception point between the component under test and an [`ExpectationManager`].
///
/// Hand a (cloned) `MockClient` to the code under test wherever it expects to issue HTTP
/// requests: every call to [`execute`](MockClient::execute) is answered by the
/// [`MockRestServer`] currently bound to it, without touching the network.
///
/// Binding a new server to the same client replaces the previous one: clones handed out
/// earlier follow along.
///
/// [`MockRestServer`]: crate::MockRestServer
#[derive(Clone, Default)]
pub struct MockClient {
    manager: Arc<RwLock<Option<Arc<ExpectationManager>>>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&self, manager: Arc<ExpectationManager>) {
        let mut slot = self.manager.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            debug!("Rebinding client to a new expectation manager.");
        }
        *slot = Some(manager);
    }

    /// Issue `request`, returning the response of the matching expectation or the error
    /// raised while matching or responding.
    pub fn execute(&self, request: &Request) -> Result<Response, Error> {
        // Clone the manager out: the slot lock must not be held while responding.
        let manager = self
            .manager
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match manager {
            Some(manager) => manager.validate_request(request),
            None => Err(Error::NotBound),
        }
    }

    /// Shorthand for `execute(&Request::get(url))`.
    pub fn get<U: AsRef<str>>(&self, url: U) -> Result<Response, Error> {
        self.execute(&Request::get(url))
    }
}

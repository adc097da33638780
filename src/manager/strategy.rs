use crate::expectation::Expectation;
use crate::{Error, Request};

/// The part of request matching that differs between ordering disciplines.
///
/// The [`ExpectationManager`](crate::ExpectationManager) owns the expectations and the logs;
/// a strategy only decides, under the manager lock, which expectation takes a request.
pub(crate) trait OrderingStrategy: Send {
    /// Called on the first request after construction or `reset`.
    fn expectations_declared(&mut self, expectations: &[Expectation]);

    /// Pick the expectation that takes `request` and record the match on it.
    ///
    /// `Ok(None)` means no declared expectation can take the request at all.
    fn match_request(
        &mut self,
        expectations: &mut [Expectation],
        request: &Request,
    ) -> Result<Option<usize>, Error>;

    /// Forget cursors and groups. The expectations themselves are dropped by the manager.
    fn reset(&mut self);
}

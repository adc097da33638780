use super::strategy::OrderingStrategy;
use crate::expectation::Expectation;
use crate::{Error, Request};
use log::debug;

/// Requests must follow declaration order with respect to expectations that have not reached
/// their minimum yet.
///
/// Expectations are scanned in declaration order on every request. A satisfied expectation
/// that does not match is skipped; an unsatisfied one must match, or the request fails.
#[derive(Debug, Default)]
pub(crate) struct StrictOrder;

impl OrderingStrategy for StrictOrder {
    fn expectations_declared(&mut self, _expectations: &[Expectation]) {}

    fn match_request(
        &mut self,
        expectations: &mut [Expectation],
        request: &Request,
    ) -> Result<Option<usize>, Error> {
        let mut matching = None;
        for (index, expectation) in expectations.iter().enumerate() {
            if expectation.is_satisfied() {
                match expectation.matches(request) {
                    Ok(()) => {
                        matching = Some(index);
                        break;
                    }
                    Err(e) if e.is_mismatch() => continue,
                    Err(e) => return Err(e),
                }
            } else {
                expectation.matches(request)?;
                matching = Some(index);
                break;
            }
        }

        match matching {
            Some(index) => {
                debug!("Request matched expectation #{}.", index);
                expectations[index].increment_and_validate()?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    fn reset(&mut self) {}
}

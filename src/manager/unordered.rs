use super::group::ExpectationGroup;
use super::strategy::OrderingStrategy;
use crate::expectation::Expectation;
use crate::{Error, Request};

/// Any declared expectation with remaining count may take any request; the first one, in
/// declaration order, whose matchers pass wins.
#[derive(Debug, Default)]
pub(crate) struct UnorderedOrder {
    group: ExpectationGroup,
}

impl OrderingStrategy for UnorderedOrder {
    fn expectations_declared(&mut self, expectations: &[Expectation]) {
        self.group.add_expectations(0..expectations.len());
    }

    fn match_request(
        &mut self,
        expectations: &mut [Expectation],
        request: &Request,
    ) -> Result<Option<usize>, Error> {
        match self.group.find_expectation(expectations, request)? {
            Some(index) => {
                self.group.update(expectations, index)?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    fn reset(&mut self) {
        self.group.reset();
    }
}

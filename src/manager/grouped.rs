use super::group::ExpectationGroup;
use super::strategy::OrderingStrategy;
use crate::expectation::Expectation;
use crate::{Error, Request};
use log::debug;

/// First occurrences follow declaration order; expectations that already matched once may
/// match again at any point while they have remaining count.
#[derive(Debug, Default)]
pub(crate) struct GroupedOrder {
    group: ExpectationGroup,
    /// Position of the next expectation to activate. `None` until the first request.
    cursor: Option<usize>,
}

impl OrderingStrategy for GroupedOrder {
    fn expectations_declared(&mut self, _expectations: &[Expectation]) {
        self.cursor = Some(0);
    }

    fn match_request(
        &mut self,
        expectations: &mut [Expectation],
        request: &Request,
    ) -> Result<Option<usize>, Error> {
        let index = match self.group.find_expectation(expectations, request)? {
            Some(index) => index,
            None => {
                let next = match self.cursor {
                    Some(next) if next < expectations.len() => next,
                    _ => return Ok(None),
                };
                // The cursor moves forward even if the expectation does not match.
                self.cursor = Some(next + 1);
                debug!("Activating expectation #{}.", next);
                expectations[next].matches(request)?;
                next
            }
        };
        self.group.update(expectations, index)?;
        Ok(Some(index))
    }

    fn reset(&mut self) {
        self.cursor = None;
        self.group.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::GroupedOrder;
    use crate::expectation::Expectation;
    use crate::manager::strategy::OrderingStrategy;
    use crate::matchers::request_to;
    use crate::mock::Matcher;
    use crate::{ExpectedCount, Request};

    fn declare(uris: &[&str]) -> Vec<Expectation> {
        uris.iter()
            .map(|uri| Expectation::new(ExpectedCount::at_least(1), Matcher::new(request_to(*uri))))
            .collect()
    }

    #[test]
    fn nothing_matches_before_expectations_are_declared() {
        // Arrange
        let mut expectations = declare(&["/a"]);
        let mut strategy = GroupedOrder::default();

        // Act
        let outcome = strategy.match_request(&mut expectations, &Request::get("/a"));

        // Assert
        assert_eq!(outcome.unwrap(), None);
    }

    #[test]
    fn the_cursor_sees_expectations_declared_after_the_first_request() {
        // Arrange
        let mut expectations = declare(&["/a"]);
        let mut strategy = GroupedOrder::default();
        strategy.expectations_declared(&expectations);
        strategy
            .match_request(&mut expectations, &Request::get("/a"))
            .unwrap();

        // Act
        expectations.push(Expectation::new(
            ExpectedCount::once(),
            Matcher::new(request_to("/b")),
        ));
        let outcome = strategy.match_request(&mut expectations, &Request::get("/b"));

        // Assert
        assert_eq!(outcome.unwrap(), Some(1));
    }

    #[test]
    fn reset_rewinds_the_cursor() {
        // Arrange
        let mut expectations = declare(&["/a", "/b"]);
        let mut strategy = GroupedOrder::default();
        strategy.expectations_declared(&expectations);
        strategy
            .match_request(&mut expectations, &Request::get("/a"))
            .unwrap();

        // Act
        strategy.reset();
        let mut expectations = declare(&["/b"]);
        strategy.expectations_declared(&expectations);
        let outcome = strategy.match_request(&mut expectations, &Request::get("/b"));

        // Assert
        assert_eq!(outcome.unwrap(), Some(0));
    }
}

use crate::expectation::Expectation;
use crate::{Error, Request};
use log::debug;

/// A set of expectations that may match in any relative order.
///
/// Members are positions in the manager's expectation list, kept in the order they joined.
#[derive(Debug, Default)]
pub(crate) struct ExpectationGroup {
    members: Vec<usize>,
}

impl ExpectationGroup {
    pub(crate) fn add_expectations(&mut self, expectations: impl IntoIterator<Item = usize>) {
        for index in expectations {
            self.add_expectation(index);
        }
    }

    fn add_expectation(&mut self, index: usize) {
        if !self.members.contains(&index) {
            self.members.push(index);
        }
    }

    /// The first member, in joining order, that still has remaining count and matches.
    ///
    /// Members that do not match are skipped; any other error stops the scan.
    pub(crate) fn find_expectation(
        &self,
        expectations: &[Expectation],
        request: &Request,
    ) -> Result<Option<usize>, Error> {
        for &index in &self.members {
            let expectation = &expectations[index];
            if !expectation.has_remaining_count() {
                continue;
            }
            match expectation.matches(request) {
                Ok(()) => {
                    debug!("Request matched grouped expectation #{}.", index);
                    return Ok(Some(index));
                }
                Err(e) if e.is_mismatch() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Record a match on `index`, adding it to the group if it is not a member yet.
    pub(crate) fn update(
        &mut self,
        expectations: &mut [Expectation],
        index: usize,
    ) -> Result<(), Error> {
        self.add_expectation(index);
        expectations[index].increment_and_validate()
    }

    pub(crate) fn reset(&mut self) {
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::ExpectationGroup;
    use crate::expectation::Expectation;
    use crate::matchers::{body_json, request_to};
    use crate::mock::Matcher;
    use crate::{Error, ExpectedCount, Request};
    use serde_json::json;

    fn expectation<M: crate::Match + 'static>(count: ExpectedCount, matcher: M) -> Expectation {
        Expectation::new(count, Matcher::new(matcher))
    }

    #[test]
    fn members_are_not_duplicated() {
        // Arrange
        let mut group = ExpectationGroup::default();

        // Act
        group.add_expectations(vec![0, 1, 0, 2, 1]);

        // Assert
        assert_eq!(group.members, vec![0, 1, 2]);
    }

    #[test]
    fn find_skips_exhausted_and_mismatching_members() {
        // Arrange
        let mut expectations = vec![
            expectation(ExpectedCount::once(), request_to("/a")),
            expectation(ExpectedCount::once(), request_to("/b")),
            expectation(ExpectedCount::once(), request_to("/a")),
        ];
        let mut group = ExpectationGroup::default();
        group.add_expectations(0..expectations.len());
        let request = Request::get("/a");

        // Act
        let first = group.find_expectation(&expectations, &request).unwrap();
        group.update(&mut expectations, 0).unwrap();
        let second = group.find_expectation(&expectations, &request).unwrap();
        group.update(&mut expectations, 2).unwrap();
        let third = group.find_expectation(&expectations, &request).unwrap();

        // Assert
        assert_eq!(first, Some(0));
        assert_eq!(second, Some(2));
        assert_eq!(third, None);
    }

    #[test]
    fn find_stops_at_fatal_errors() {
        // Arrange
        let expectations = vec![
            expectation(ExpectedCount::once(), body_json(json!({"a": 1}))),
            expectation(ExpectedCount::once(), request_to("/")),
        ];
        let mut group = ExpectationGroup::default();
        group.add_expectations(0..expectations.len());

        // Act
        let outcome = group.find_expectation(&expectations, &Request::post("/").body("{"));

        // Assert
        assert!(matches!(outcome, Err(Error::BodyConversion(_))));
    }

    #[test]
    fn update_adds_new_members_and_validates_the_count() {
        // Arrange
        let mut expectations = vec![expectation(ExpectedCount::once(), request_to("/a"))];
        let mut group = ExpectationGroup::default();

        // Act
        let first = group.update(&mut expectations, 0);
        let second = group.update(&mut expectations, 0);

        // Assert
        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::TooManyCalls)));
        assert_eq!(group.members, vec![0]);
    }

    #[test]
    fn reset_empties_the_group() {
        // Arrange
        let expectations = vec![expectation(ExpectedCount::once(), request_to("/a"))];
        let mut group = ExpectationGroup::default();
        group.add_expectations(0..1);

        // Act
        group.reset();

        // Assert
        assert_eq!(
            group
                .find_expectation(&expectations, &Request::get("/a"))
                .unwrap(),
            None
        );
    }
}

use mockrest::matchers::request_to;
use mockrest::responses::with_success;
use mockrest::{ExpectationManager, ExpectedCount, Request, RequestOrder, ResponseTemplate};
use proptest::prelude::*;

const URIS: [&str; 3] = ["/a", "/b", "/c"];

fn expected_count() -> impl Strategy<Value = ExpectedCount> {
    prop_oneof![
        (0u64..3, 0u64..3).prop_map(|(min, extra)| ExpectedCount::between(min, min + extra)),
        (1u64..3).prop_map(ExpectedCount::at_least),
    ]
}

fn request_order() -> impl Strategy<Value = RequestOrder> {
    prop_oneof![
        Just(RequestOrder::Strict),
        Just(RequestOrder::Grouped),
        Just(RequestOrder::Unordered),
    ]
}

proptest! {
    // Every expectation answers with `200 + its index`, which tells the test which one took
    // the request. Failed requests never move an unsatisfied expectation forward, so counting
    // successes is enough to know which expectations are satisfied.
    #[test]
    fn strict_rejects_requests_the_first_unsatisfied_expectation_does_not_match(
        declared in prop::collection::vec((0..URIS.len(), expected_count()), 1..6),
        requests in prop::collection::vec(0..URIS.len(), 0..12),
    ) {
        let manager = ExpectationManager::new(RequestOrder::Strict);
        for (index, (uri, count)) in declared.iter().enumerate() {
            manager
                .expect_request(*count, request_to(URIS[*uri]))
                .and_respond(ResponseTemplate::new(200 + index as u16));
        }
        let mut matched = vec![0u64; declared.len()];

        for uri in requests {
            let first_unsatisfied = declared
                .iter()
                .zip(&matched)
                .position(|((_, count), matched)| *matched < count.min());
            let outcome = manager.validate_request(&Request::get(URIS[uri]));

            if let Some(first) = first_unsatisfied {
                if declared[first].0 != uri {
                    prop_assert!(outcome.is_err());
                }
            }
            if let Ok(response) = outcome {
                let index = usize::from(response.status().as_u16() - 200);
                prop_assert_eq!(declared[index].0, uri);
                if let Some(first) = first_unsatisfied {
                    prop_assert!(index <= first);
                }
                matched[index] += 1;
            }
        }
    }

    #[test]
    fn an_exact_count_rejects_one_call_too_many(
        order in request_order(),
        times in 1u64..8,
    ) {
        let manager = ExpectationManager::new(order);
        manager
            .expect_request(ExpectedCount::times(times), request_to("/a"))
            .and_respond(with_success());

        for _ in 0..times {
            prop_assert!(manager.validate_request(&Request::get("/a")).is_ok());
        }
        prop_assert!(manager.verify().is_ok());

        prop_assert!(manager.validate_request(&Request::get("/a")).is_err());
        prop_assert!(manager.verify().is_err());
    }
}

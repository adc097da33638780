use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mockrest::matchers::{method, request_to};
use mockrest::responses::with_success;
use mockrest::{ExpectationManager, ExpectedCount, Request, RequestOrder};

const EXPECTATIONS: usize = 50;

fn declared(order: RequestOrder) -> (ExpectationManager, Vec<Request>) {
    let manager = ExpectationManager::new(order);
    let mut requests = Vec::with_capacity(EXPECTATIONS);
    for i in 0..EXPECTATIONS {
        let uri = format!("/resource/{}", i);
        manager
            .expect_request(ExpectedCount::once(), request_to(&uri))
            .and_expect(method("GET"))
            .and_respond(with_success());
        requests.push(Request::get(uri));
    }
    (manager, requests)
}

// Matching every declared expectation once, in declaration order, so that all strategies
// accept the same sequence.
pub fn match_in_declaration_order(c: &mut Criterion) {
    for order in [RequestOrder::Strict, RequestOrder::Grouped, RequestOrder::Unordered] {
        c.bench_function(&format!("{:?}: {} requests", order, EXPECTATIONS), |b| {
            b.iter_batched(
                || declared(order),
                |(manager, requests)| {
                    for request in &requests {
                        let _ = manager.validate_request(request);
                    }
                    manager.verify()
                },
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, match_in_declaration_order);
criterion_main!(benches);

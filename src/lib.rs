//! `mockrest` lets a test declare, upfront, the HTTP requests the component under test is going
//! to issue, answer each of them with a canned response (or a failure) and afterwards verify
//! that all of them actually happened.
//!
//! Requests never reach the network: they are intercepted and matched against the declared
//! expectations by an [`ExpectationManager`].
//!
//! # Table of Contents
//! 1. [Getting started](#getting-started)
//! 2. [Matchers](#matchers)
//! 3. [Counting](#counting)
//! 4. [Request order](#request-order)
//! 5. [Verification](#verification)
//!
//! ## Getting started
//! ```rust
//! use mockrest::matchers::{method, request_to};
//! use mockrest::{MockClient, MockRestServer, ResponseTemplate};
//!
//! // The client is what the component under test uses to issue requests.
//! let client = MockClient::new();
//! let server = MockRestServer::bind_to(&client).build();
//!
//! // Arrange the behaviour of the server: a GET on '/hello' is answered with a 200.
//! server
//!     .expect(request_to("/hello"))
//!     .and_expect(method("GET"))
//!     .and_respond(ResponseTemplate::new(200).set_body_string("world"));
//!
//! let response = client.get("/hello").unwrap();
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body(), b"world");
//!
//! // Anything that was not declared fails.
//! assert!(client.get("/missing").is_err());
//! # server.reset();
//! ```
//!
//! ## Matchers
//!
//! `mockrest` provides a set of matching strategies out of the box - check the [`matchers`]
//! module for a complete list.
//!
//! You can define your own matchers using the [`Match`] trait, as well as using `Fn` closures.
//!
//! ## Counting
//!
//! Each expectation carries an [`ExpectedCount`]: the range of times it is allowed to match.
//! [`MockRestServer::expect`] expects exactly one request; use
//! [`MockRestServer::expect_count`] for anything else.
//!
//! ## Request order
//!
//! By default the first occurrence of each expected request must follow declaration order,
//! while an expectation that already matched may match again at any time. Check
//! [`RequestOrder`] for the stricter and the order-insensitive alternatives.
//!
//! ## Verification
//!
//! [`MockRestServer::verify`] panics if an expectation did not reach its minimum count or if
//! any request failed to match when it was issued, even if the component under test swallowed
//! the error. Expectations are also verified when the server goes out of scope.
//!
//! [`verify_timeout`](MockRestServer::verify_timeout) waits for requests issued from other
//! threads before judging.
mod error;
mod expectation;
mod expected_count;
mod manager;
pub mod matchers;
mod mock;
mod mock_server;
mod request;
mod respond;
mod response_template;
pub mod responses;
mod verification;

pub use error::{Error, Result};
pub use expectation::ResponseActions;
pub use expected_count::ExpectedCount;
pub use manager::{ExpectationManager, RequestOrder};
pub use mock::Match;
pub use mock_server::{MockClient, MockRestServer, MockRestServerBuilder};
pub use request::Request;
pub use respond::Respond;
pub use response_template::{Response, ResponseTemplate};
pub use verification::FailedRequest;

//! All bits and pieces concerning the test-facing side of the crate.
//!
//! `MockClient` stands in for the HTTP client of the component under test: it hands every
//! request to the `ExpectationManager` it is bound to, in place of a network round trip.
//! `MockRestServer` is what the test holds on to in order to declare and verify expectations;
//! `MockRestServerBuilder` assembles one and binds it to a client.
mod builder;
mod client;
mod exposed_server;

pub use builder::MockRestServerBuilder;
pub use client::MockClient;
pub use exposed_server::MockRestServer;

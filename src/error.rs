use std::io;

/// Everything that can go wrong while matching, answering or verifying requests.
///
/// Only [`Error::Mismatch`] is "recoverable": it is what a [`Match`] implementation returns
/// when a request does not satisfy it, and ordering strategies use it as a signal to move on
/// to the next candidate where their rules allow it. Every other variant is fatal wherever
/// it is raised.
///
/// [`Match`]: crate::Match
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A matcher rejected the request. Carries an `expected: <..> but was: <..>` description.
    #[error("{0}")]
    Mismatch(String),
    /// No declared expectation could take the request.
    #[error("{0}")]
    UnexpectedRequest(String),
    /// An expectation matched more often than its upper bound allows.
    #[error("Received more calls than expected.")]
    TooManyCalls,
    /// A response was requested from an expectation that was never given a responder.
    #[error("Call to create_response before a responder was set.")]
    NoResponder,
    /// A responder simulated a transport failure.
    #[error("{0}")]
    Transport(#[source] io::Error),
    /// A matcher had to read the request body as JSON or as a form and could not.
    #[error("Failed to convert the request body: {0}")]
    BodyConversion(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Verification found declared expectations whose minimum was not reached.
    #[error("Further request(s) expected leaving {unsatisfied} unsatisfied expectation(s).\n{details}")]
    Unsatisfied { unsatisfied: usize, details: String },
    /// Verification found requests that failed to match when they were issued.
    #[error("Some requests did not execute successfully.\n{0}")]
    FailedRequests(String),
    /// An `ExpectedCount` was built from an invalid range.
    #[error("Invalid expected count: {0}")]
    InvalidCount(String),
    /// A `MockClient` was used before any server was bound to it.
    #[error("No mock server is bound to this client.")]
    NotBound,
}

impl Error {
    /// `true` if the error only says "this candidate does not match the request".
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::Mismatch(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

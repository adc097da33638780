use crate::{Error, Request};
use std::fmt::Write;

/// A request whose matching step failed, paired with the error handed back to the client.
#[derive(Clone, Debug)]
pub struct FailedRequest {
    pub request: Request,
    pub error: String,
}

/// `N request(s) executed:` followed by one line per request, or `0 request(s) executed.`.
pub(crate) fn request_details(requests: &[Request]) -> String {
    let mut details = format!("{} request(s) executed", requests.len());
    if requests.is_empty() {
        details.push_str(".\n");
    } else {
        details.push_str(":\n");
        for request in requests {
            // Writing to a `String` never fails.
            let _ = writeln!(details, "{}", request);
        }
    }
    details
}

pub(crate) fn unexpected_request(request: &Request, requests: &[Request]) -> Error {
    Error::UnexpectedRequest(format!(
        "No further requests expected: HTTP {} {}\n{}",
        request.method,
        request.url,
        request_details(requests)
    ))
}

pub(crate) fn unsatisfied(unsatisfied: usize, requests: &[Request]) -> Error {
    Error::Unsatisfied {
        unsatisfied,
        details: request_details(requests),
    }
}

pub(crate) fn failed_requests(failed: &[FailedRequest]) -> Error {
    let report = failed
        .iter()
        .map(|f| format!("Failed request:\n{}\n{}", f.request, f.error))
        .collect::<Vec<_>>()
        .join("\n");
    Error::FailedRequests(format!("\n{}", report))
}

pub(crate) enum VerificationOutcome {
    /// Every declared expectation reached its minimum and no request failed.
    Success,
    /// Some expectations are still waiting for requests.
    Pending(usize),
    /// At least one request failed to match when it was issued.
    Failed(Error),
}

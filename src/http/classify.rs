//! Classification of single-attempt results into retryable failures.

use reqwest::StatusCode;

use super::error::{AttemptError, HttpStatusFailure, TransportFailure, TransportKind};
use super::response::Response;

/// Maps a reqwest error to the kind of transport failure it represents.
/// A connect timeout counts as a timeout.
pub fn classify_error(error: &reqwest::Error) -> TransportKind {
    if error.is_timeout() {
        TransportKind::Timeout
    } else if error.is_connect() {
        TransportKind::Connection
    } else {
        TransportKind::Request
    }
}

/// Wraps a reqwest error as a `TransportFailure` of the matching kind.
pub fn transport_failure(error: reqwest::Error) -> TransportFailure {
    let kind = classify_error(&error);
    TransportFailure::from_reqwest(kind, error)
}

/// Returns true for statuses that count as a failed attempt (4xx and 5xx).
pub fn is_failure_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// Checks a received response, turning 4xx/5xx into an `HttpStatusFailure`.
pub fn check_status(response: Response) -> Result<Response, HttpStatusFailure> {
    if is_failure_status(response.status()) {
        Err(HttpStatusFailure::new(response.status()))
    } else {
        Ok(response)
    }
}

/// Classifies the raw result of one transport call.
pub fn classify_attempt(
    result: Result<Response, TransportFailure>,
) -> Result<Response, AttemptError> {
    let response = result?;
    Ok(check_status(response)?)
}

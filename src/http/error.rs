//! Error taxonomy for single attempts and for exhausted retries.

use reqwest::{Method, StatusCode};
use std::fmt;

/// Category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The request did not complete within its timeout.
    Timeout,
    /// The connection could not be established or was dropped.
    Connection,
    /// Any other client-side failure (invalid URL, body read error, ...).
    Request,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connection => "connection",
            TransportKind::Request => "request",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// No response was received.
#[derive(Debug)]
pub struct TransportFailure {
    kind: TransportKind,
    message: String,
    source: Option<reqwest::Error>,
}

impl TransportFailure {
    pub fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a reqwest error, keeping it as the source.
    pub fn from_reqwest(kind: TransportKind, error: reqwest::Error) -> Self {
        Self {
            kind,
            message: error.to_string(),
            source: Some(error),
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// A response arrived but its status is 4xx or 5xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusFailure {
    status: StatusCode,
}

impl HttpStatusFailure {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for HttpStatusFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.status.is_server_error() {
            "Server Error"
        } else {
            "Client Error"
        };
        match self.status.canonical_reason() {
            Some(reason) => write!(f, "HTTP {} {}: {}", self.status.as_u16(), kind, reason),
            None => write!(f, "HTTP {} {}", self.status.as_u16(), kind),
        }
    }
}

impl std::error::Error for HttpStatusFailure {}

/// Why one attempt failed.
#[derive(Debug)]
pub enum AttemptError {
    Transport(TransportFailure),
    Status(HttpStatusFailure),
}

impl AttemptError {
    /// Short category string: "timeout", "connection", "request" or "http-status".
    pub fn category(&self) -> &'static str {
        match self {
            AttemptError::Transport(failure) => failure.kind().as_str(),
            AttemptError::Status(_) => "http-status",
        }
    }

    /// Status code of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AttemptError::Transport(_) => None,
            AttemptError::Status(failure) => Some(failure.status()),
        }
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Transport(failure) => failure.fmt(f),
            AttemptError::Status(failure) => failure.fmt(f),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttemptError::Transport(failure) => Some(failure),
            AttemptError::Status(failure) => Some(failure),
        }
    }
}

impl From<TransportFailure> for AttemptError {
    fn from(failure: TransportFailure) -> Self {
        AttemptError::Transport(failure)
    }
}

impl From<HttpStatusFailure> for AttemptError {
    fn from(failure: HttpStatusFailure) -> Self {
        AttemptError::Status(failure)
    }
}

/// Every allowed attempt failed. Carries the terminal attempt's error.
#[derive(Debug)]
pub struct RequestFailed {
    method: Method,
    url: String,
    attempts: u32,
    error: AttemptError,
}

impl RequestFailed {
    pub fn new(method: Method, url: impl Into<String>, attempts: u32, error: AttemptError) -> Self {
        Self {
            method,
            url: url.into(),
            attempts,
            error,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Total number of attempts made, including the terminal one.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn category(&self) -> &'static str {
        self.error.category()
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn terminal_error(&self) -> &AttemptError {
        &self.error
    }
}

impl fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[HTTP {}] Request to {} failed after {} attempts ({}): {}",
            self.method,
            self.url,
            self.attempts,
            self.category(),
            self.error
        )
    }
}

impl std::error::Error for RequestFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A retry policy parameter was out of range.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidPolicy {
    /// `max_attempts` must be at least 1.
    ZeroAttempts,
    /// Timeout must be greater than zero.
    ZeroTimeout,
    /// Backoff base must be a finite positive number.
    BackoffBase(f64),
}

impl fmt::Display for InvalidPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPolicy::ZeroAttempts => write!(f, "max attempts must be at least 1"),
            InvalidPolicy::ZeroTimeout => write!(f, "timeout must be greater than zero"),
            InvalidPolicy::BackoffBase(base) => {
                write!(f, "backoff base must be a positive number, got {}", base)
            }
        }
    }
}

impl std::error::Error for InvalidPolicy {}

/// Failure of the one-call `make_request` helper.
#[derive(Debug)]
pub enum MakeRequestError {
    /// The retry options were rejected before any request was sent.
    Policy(InvalidPolicy),
    /// Every attempt failed.
    Failed(RequestFailed),
}

impl fmt::Display for MakeRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakeRequestError::Policy(err) => write!(f, "invalid retry options: {}", err),
            MakeRequestError::Failed(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for MakeRequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MakeRequestError::Policy(err) => Some(err),
            MakeRequestError::Failed(err) => err.source(),
        }
    }
}

impl From<InvalidPolicy> for MakeRequestError {
    fn from(err: InvalidPolicy) -> Self {
        MakeRequestError::Policy(err)
    }
}

impl From<RequestFailed> for MakeRequestError {
    fn from(err: RequestFailed) -> Self {
        MakeRequestError::Failed(err)
    }
}

/// The method string is not a standard HTTP verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMethod(pub String);

impl fmt::Display for UnsupportedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnsupportedMethod {}

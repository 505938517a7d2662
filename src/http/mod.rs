//! HTTP request and response types, single-shot transport and error classification.

mod classify;
pub mod error;
mod request;
mod response;
mod transport;

pub use classify::{check_status, classify_attempt, classify_error, is_failure_status, transport_failure};
pub use error::{
    AttemptError, HttpStatusFailure, InvalidPolicy, MakeRequestError, RequestFailed, TransportFailure, TransportKind,
    UnsupportedMethod,
};
pub use request::{RequestSpec, parse_method};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

#[cfg(test)]
pub use transport::MockTransport;

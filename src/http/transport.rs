//! Single-shot HTTP transport.

use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

use super::classify::transport_failure;
use super::error::TransportFailure;
use super::request::RequestSpec;
use super::response::Response;

/// Performs exactly one HTTP call. No retries, no status checks.
///
/// A response with any status is returned as `Ok`; only failures to get a
/// response at all are errors.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn send(&self, spec: &RequestSpec, timeout: Duration) -> Result<Response, TransportFailure>;
}

/// Blocking transport backed by reqwest.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport sending through `client`, e.g. one with a proxy or custom TLS.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, spec), fields(method = %spec.method(), url = spec.url()))]
    fn send(&self, spec: &RequestSpec, timeout: Duration) -> Result<Response, TransportFailure> {
        let mut request = self
            .client
            .request(spec.method().clone(), spec.url())
            .timeout(timeout);

        for (name, value) in spec.header_map() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = spec.payload() {
            request = request.json(body);
        }

        let response = request.send().map_err(transport_failure)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(transport_failure)?;

        debug!("{} {} -> {} ({} bytes)", spec.method(), spec.url(), status, body.len());

        Ok(Response::new(status, headers, body.to_vec()))
    }
}

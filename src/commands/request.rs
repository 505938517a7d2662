use anyhow::{Context, Result, bail};
use log::debug;
use std::time::Duration;

use crate::executor::RetryingRequestExecutor;
use crate::http::{RequestSpec, Response, parse_method};
use crate::retry::RetryPolicy;

/// Arguments of the `request` command.
#[derive(Debug, Clone)]
pub struct RequestCommand {
    pub method: String,
    pub url: String,
    pub headers: Vec<String>,
    pub json: Option<String>,
    pub max_attempts: u32,
    pub timeout_secs: f64,
    pub backoff_base: f64,
}

impl RequestCommand {
    fn spec(&self) -> Result<RequestSpec> {
        let method = parse_method(&self.method)?;
        let mut spec = RequestSpec::new(method, self.url.as_str());

        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            spec = spec.header(name, value);
        }

        if let Some(body) = &self.json {
            let value: serde_json::Value =
                serde_json::from_str(body).context("Invalid JSON payload")?;
            spec = spec.payload_value(value);
        }

        Ok(spec)
    }

    fn policy(&self) -> Result<RetryPolicy> {
        let timeout = Duration::try_from_secs_f64(self.timeout_secs)
            .with_context(|| format!("Invalid timeout: {}", self.timeout_secs))?;
        let policy = RetryPolicy::new(self.max_attempts, timeout, self.backoff_base)?;
        Ok(policy)
    }
}

/// Run one request through the retrying executor and print the response.
#[tracing::instrument(skip(cmd), fields(method = %cmd.method, url = %cmd.url))]
pub fn request(cmd: RequestCommand) -> Result<()> {
    let spec = cmd.spec()?;
    let policy = cmd.policy()?;
    debug!("Using retry policy: {:?}", policy);

    let response = RetryingRequestExecutor::new().execute(&spec, &policy)?;
    print_response(&response)
}

fn print_response(response: &Response) -> Result<()> {
    println!("HTTP {}", response.status());
    match response.json_value() {
        Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
        None => println!("{}", response.text()),
    }
    Ok(())
}

/// Parses a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("Invalid header '{}', expected 'Name: value'", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid header '{}', missing name", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

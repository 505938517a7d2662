//! Retrying request executor.
//!
//! Issues one logical request, retrying transport failures and 4xx/5xx
//! responses with exponential backoff until the policy runs out of attempts.

use log::debug;
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::http::{
    MakeRequestError, ReqwestTransport, RequestFailed, RequestSpec, Response, Transport,
    classify_attempt,
};
use crate::retry::{
    AttemptOutcome, DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS, LogObserver,
    RetryDecision, RetryObserver, RetryPolicy, Sleeper, ThreadSleeper,
};

/// Runs requests through a [`Transport`] under a [`RetryPolicy`], sleeping
/// through a [`Sleeper`] and reporting failed attempts to a [`RetryObserver`].
pub struct RetryingRequestExecutor<T = ReqwestTransport, S = ThreadSleeper, O = LogObserver> {
    transport: T,
    sleeper: S,
    observer: O,
}

impl RetryingRequestExecutor {
    /// Executor with a default reqwest client, real sleeps and log output.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for RetryingRequestExecutor {
    fn default() -> Self {
        Self::with_parts(ReqwestTransport::default(), ThreadSleeper, LogObserver)
    }
}

impl<T, S, O> RetryingRequestExecutor<T, S, O>
where
    T: Transport,
    S: Sleeper,
    O: RetryObserver,
{
    pub fn with_parts(transport: T, sleeper: S, observer: O) -> Self {
        Self {
            transport,
            sleeper,
            observer,
        }
    }

    /// Executes `spec`, retrying failed attempts as `policy` allows.
    ///
    /// Returns the first response with a status below 400. When every
    /// attempt fails, returns [`RequestFailed`] carrying the last error;
    /// earlier errors only reach the observer.
    #[tracing::instrument(skip(self, spec, policy), fields(method = %spec.method(), url = spec.url()))]
    pub fn execute(&self, spec: &RequestSpec, policy: &RetryPolicy) -> Result<Response, RequestFailed> {
        let max_attempts = policy.max_attempts();
        let mut attempt = 1;

        loop {
            debug!(
                "[HTTP {}] {}: attempt {}/{}",
                spec.method(),
                spec.url(),
                attempt,
                max_attempts
            );

            let result = classify_attempt(self.transport.send(spec, policy.timeout()));

            match policy.decide(attempt, AttemptOutcome::from(result)) {
                RetryDecision::Done(response) => return Ok(response),
                RetryDecision::RetryAfter(err, delay) => {
                    self.observer.on_retry(attempt, max_attempts, &err, delay);
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                RetryDecision::GiveUp(err) => {
                    self.observer.on_give_up(attempt, &err);
                    return Err(RequestFailed::new(
                        spec.method().clone(),
                        spec.url(),
                        attempt,
                        err,
                    ));
                }
            }
        }
    }

    /// Shorthand for a GET without headers or payload.
    pub fn get(&self, url: &str, policy: &RetryPolicy) -> Result<Response, RequestFailed> {
        self.execute(&RequestSpec::get(url), policy)
    }

    /// Shorthand for a POST with a JSON payload and no extra headers.
    pub fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
        policy: &RetryPolicy,
    ) -> Result<Response, RequestFailed> {
        self.execute(&RequestSpec::post(url).payload_value(body), policy)
    }
}

/// Optional parts of a [`make_request`] call.
///
/// Defaults: no headers, no payload, 3 attempts, 10 s timeout, backoff factor 2.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub json: Option<serde_json::Value>,
    pub max_retries: u32,
    pub timeout: Duration,
    pub backoff_factor: f64,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: BTreeMap::new(),
            json: None,
            max_retries: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            backoff_factor: DEFAULT_BACKOFF_BASE,
        }
    }
}

/// One-call helper: validates the retry options, builds the request and runs
/// it through a default executor.
pub fn make_request(
    method: Method,
    url: &str,
    options: RequestOptions,
) -> Result<Response, MakeRequestError> {
    let RequestOptions {
        headers,
        json,
        max_retries,
        timeout,
        backoff_factor,
    } = options;

    let policy = RetryPolicy::new(max_retries, timeout, backoff_factor)?;

    let mut spec = RequestSpec::new(method, url).headers(headers);
    if let Some(body) = json {
        spec = spec.payload_value(body);
    }

    Ok(RetryingRequestExecutor::new().execute(&spec, &policy)?)
}

//! Retry policy, backoff schedule and the seams the retry loop is built on.

use log::{error, warn};
use std::time::Duration;

use crate::http::{AttemptError, InvalidPolicy, Response};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default base of the exponential backoff.
pub const DEFAULT_BACKOFF_BASE: f64 = 2.0;

/// How many times to try, how long each try may take, and how fast the
/// delay between tries grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    timeout: Duration,
    backoff_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, timeout: Duration, backoff_base: f64) -> Result<Self, InvalidPolicy> {
        RetryPolicy::default()
            .with_max_attempts(max_attempts)?
            .with_timeout(timeout)?
            .with_backoff_base(backoff_base)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self, InvalidPolicy> {
        if max_attempts == 0 {
            return Err(InvalidPolicy::ZeroAttempts);
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, InvalidPolicy> {
        if timeout.is_zero() {
            return Err(InvalidPolicy::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_backoff_base(mut self, backoff_base: f64) -> Result<Self, InvalidPolicy> {
        if !backoff_base.is_finite() || backoff_base <= 0.0 {
            return Err(InvalidPolicy::BackoffBase(backoff_base));
        }
        self.backoff_base = backoff_base;
        Ok(self)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backoff_base(&self) -> f64 {
        self.backoff_base
    }

    /// Delay after the failed attempt `attempt` (1-based): `backoff_base^(attempt - 1)` seconds.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Decides what the retry loop does after attempt number `attempt`.
    pub fn decide(&self, attempt: u32, outcome: AttemptOutcome) -> RetryDecision {
        match outcome {
            AttemptOutcome::Success(response) => RetryDecision::Done(response),
            AttemptOutcome::Failed(err) if attempt >= self.max_attempts => RetryDecision::GiveUp(err),
            AttemptOutcome::Failed(err) => RetryDecision::RetryAfter(err, self.backoff_for(attempt)),
        }
    }
}

/// Result of one attempt, already classified.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A response with a status below 400.
    Success(Response),
    /// A transport failure or a 4xx/5xx response. Always retryable.
    Failed(AttemptError),
}

impl From<Result<Response, AttemptError>> for AttemptOutcome {
    fn from(result: Result<Response, AttemptError>) -> Self {
        match result {
            Ok(response) => AttemptOutcome::Success(response),
            Err(err) => AttemptOutcome::Failed(err),
        }
    }
}

/// What the retry loop does next.
#[derive(Debug)]
pub enum RetryDecision {
    /// Return the response to the caller.
    Done(Response),
    /// Report the error, sleep for the delay, then try again.
    RetryAfter(AttemptError, Duration),
    /// No attempts left; the error is terminal.
    GiveUp(AttemptError),
}

/// Blocks the calling thread between attempts.
#[cfg_attr(test, mockall::automock)]
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps with `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Receives failed attempts. Intermediate failures go to `on_retry`, the
/// terminal one to `on_give_up`.
#[cfg_attr(test, mockall::automock)]
pub trait RetryObserver {
    fn on_retry(&self, attempt: u32, max_attempts: u32, error: &AttemptError, delay: Duration);

    fn on_give_up(&self, attempts: u32, error: &AttemptError);
}

/// Reports retries through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RetryObserver for LogObserver {
    fn on_retry(&self, attempt: u32, max_attempts: u32, error: &AttemptError, delay: Duration) {
        warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}...",
            attempt, max_attempts, error, delay
        );
    }

    fn on_give_up(&self, attempts: u32, error: &AttemptError) {
        error!("Giving up after {} attempts: {}", attempts, error);
    }
}

/// Discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {
    fn on_retry(&self, _: u32, _: u32, _: &AttemptError, _: Duration) {}

    fn on_give_up(&self, _: u32, _: &AttemptError) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpStatusFailure, TransportFailure, TransportKind};
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;

    fn failed() -> AttemptOutcome {
        AttemptOutcome::Failed(TransportFailure::new(TransportKind::Connection, "refused").into())
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.timeout(), Duration::from_secs(10));
        assert_eq!(policy.backoff_base(), 2.0);
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        assert_eq!(
            RetryPolicy::new(0, Duration::from_secs(1), 2.0).unwrap_err(),
            InvalidPolicy::ZeroAttempts
        );
        assert_eq!(
            RetryPolicy::new(1, Duration::ZERO, 2.0).unwrap_err(),
            InvalidPolicy::ZeroTimeout
        );
        assert!(matches!(
            RetryPolicy::new(1, Duration::from_secs(1), 0.0),
            Err(InvalidPolicy::BackoffBase(_))
        ));
        assert!(matches!(
            RetryPolicy::new(1, Duration::from_secs(1), f64::NAN),
            Err(InvalidPolicy::BackoffBase(_))
        ));
    }

    #[test]
    fn test_backoff_schedule_base_two() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_schedule_base_three() {
        let policy = RetryPolicy::default().with_backoff_base(3.0).unwrap();
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(3));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(9));
    }

    #[test]
    fn test_backoff_fractional_base() {
        let policy = RetryPolicy::default().with_backoff_base(0.5).unwrap();
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::default().with_backoff_base(1e10).unwrap();
        assert_eq!(policy.backoff_for(u32::MAX), Duration::MAX);
    }

    #[test]
    fn test_decide_success_returns_response() {
        let policy = RetryPolicy::default();
        let outcome = AttemptOutcome::Success(Response::new(StatusCode::OK, HeaderMap::new(), "ok"));
        assert!(matches!(policy.decide(1, outcome), RetryDecision::Done(_)));
    }

    #[test]
    fn test_decide_retries_until_last_attempt() {
        let policy = RetryPolicy::default();
        match policy.decide(1, failed()) {
            RetryDecision::RetryAfter(_, delay) => assert_eq!(delay, Duration::from_secs(1)),
            other => panic!("Expected RetryAfter, got {:?}", other),
        }
        match policy.decide(2, failed()) {
            RetryDecision::RetryAfter(_, delay) => assert_eq!(delay, Duration::from_secs(2)),
            other => panic!("Expected RetryAfter, got {:?}", other),
        }
        assert!(matches!(policy.decide(3, failed()), RetryDecision::GiveUp(_)));
    }

    #[test]
    fn test_decide_single_attempt_gives_up_immediately() {
        let policy = RetryPolicy::default().with_max_attempts(1).unwrap();
        let outcome = AttemptOutcome::Failed(
            HttpStatusFailure::new(StatusCode::INTERNAL_SERVER_ERROR).into(),
        );
        match policy.decide(1, outcome) {
            RetryDecision::GiveUp(err) => assert_eq!(err.category(), "http-status"),
            other => panic!("Expected GiveUp, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: Result<Response, AttemptError> =
            Ok(Response::new(StatusCode::OK, HeaderMap::new(), Vec::new()));
        assert!(matches!(AttemptOutcome::from(ok), AttemptOutcome::Success(_)));

        let err: Result<Response, AttemptError> =
            Err(TransportFailure::new(TransportKind::Timeout, "slow").into());
        assert!(matches!(AttemptOutcome::from(err), AttemptOutcome::Failed(_)));
    }
}

//! Retry executor
//!
//! Wraps one fallible async call with retry-on-failure semantics:
//! - only `Error::is_retryable()` failures (HTTP 5xx, 429) are retried
//! - a `Retry-After` hint wins over computed backoff
//! - computed backoff grows geometrically with random jitter and a cap
//! - cancellation is observed before every attempt and during every delay

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Backoff curve and attempt budget
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, first attempt included
    pub max_attempts: u32,
    /// Backoff after the first failure
    pub initial_backoff: Duration,
    /// Growth factor between consecutive backoffs
    pub multiplier: f64,
    /// Jitter upper bound as a fraction of the backoff
    pub jitter_factor: f64,
    /// Cap on any computed delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            multiplier: config.multiplier,
            jitter_factor: config.jitter_factor,
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// Backoff before jitter for the delay following failed `attempt` (1-based)
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let ms = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(exponent);
        Duration::from_millis(ms.min(self.max_backoff.as_millis() as f64) as u64)
    }

    /// Backoff plus jitter, where `sample` is drawn from `[0, 1)`
    pub fn jittered_backoff(&self, attempt: u32, sample: f64) -> Duration {
        let base = self.base_backoff(attempt);
        let jitter_ms = base.as_millis() as f64 * self.jitter_factor * sample.clamp(0.0, 1.0);
        let total = base + Duration::from_millis(jitter_ms as u64);
        total.min(self.max_backoff)
    }

    /// Delay before the attempt following failed `attempt`
    pub fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        match error.retry_after() {
            Some(hint) => hint,
            None => self.jittered_backoff(attempt, rand::random::<f64>()),
        }
    }
}

/// Progress of one retried call
#[derive(Debug, Default)]
struct RetryState {
    attempt: u32,
    last_error: Option<Error>,
}

/// Runs calls under a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create an executor with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Create an executor from configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(RetryPolicy::from(config))
    }

    /// The policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out.
    ///
    /// On failure the error of the last attempt is returned unchanged.
    pub async fn execute<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(None, call).await
    }

    /// Like [`execute`](Self::execute), but gives up with `Error::Cancelled`
    /// as soon as `cancel` fires between attempts.
    pub async fn execute_until<T, F, Fut>(&self, cancel: &CancellationToken, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(Some(cancel), call).await
    }

    async fn run<T, F, Fut>(&self, cancel: Option<&CancellationToken>, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut state = RetryState::default();

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!(attempt = state.attempt, last_error = ?state.last_error, "retry cancelled");
                return Err(Error::Cancelled);
            }

            state.attempt += 1;
            let err = match call().await {
                Ok(value) => {
                    if state.attempt > 1 {
                        debug!(attempt = state.attempt, "call recovered after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                warn!(attempt = state.attempt, error = %err, "giving up: not retryable");
                return Err(err);
            }
            if state.attempt >= self.policy.max_attempts {
                warn!(attempts = state.attempt, error = %err, "giving up: retries exhausted");
                return Err(err);
            }

            let delay = self.policy.delay_for(state.attempt, &err);
            warn!(
                attempt = state.attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                cause = %err,
                "retrying failed call"
            );
            state.last_error = Some(err);

            match cancel {
                Some(token) => {
                    tokio::select! {
                        () = token.cancelled() => {
                            debug!(attempt = state.attempt, last_error = ?state.last_error, "retry cancelled during backoff");
                            return Err(Error::Cancelled);
                        }
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
    }
}

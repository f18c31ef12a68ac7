//! Retry policy and per-call retry state.
//!
//! The decision of whether and how long to wait before another attempt lives
//! here, independent of how the wait happens. The async client sleeps with
//! `tokio::time::sleep`, the blocking client with `std::thread::sleep`; both
//! drive the same [`RetryState`], so their retry behavior is identical.

use crate::{metadata::RequestMetadata, Error, Response, Result};
use rand::Rng;
use std::time::{Duration, Instant};

/// How failed requests are retried.
///
/// The delay before retry `n` (after attempt index `n - 1` failed) is
/// `base_delay * 2^(n - 1)`, capped at `max_delay`. With the default base of
/// one second this is 1s, 2s, 4s, ...
///
/// # Examples
///
/// ```
/// use memoryrelay::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.backoff(0), Duration::from_secs(1));
/// assert_eq!(policy.backoff(2), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per logical call, including the first. Zero is treated
    /// as one.
    pub max_attempts: usize,

    /// Backoff unit: the wait after the first failed attempt.
    pub base_delay: Duration,

    /// Upper bound on any single wait, including `Retry-After` waits.
    pub max_delay: Duration,

    /// Scale each backoff by a random factor in `[0.5, 1.0]`.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(300),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Returns the backoff after the failed attempt with 0-based index
    /// `attempt`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt.min(31) as u32);
        let delay = self.base_delay.saturating_mul(multiplier).min(self.max_delay);

        if self.jitter {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
            delay.mul_f64(jitter_factor)
        } else {
            delay
        }
    }

    /// Starts the retry state for one logical call.
    pub fn start(&self) -> RetryState<'_> {
        RetryState {
            policy: self,
            attempt: 0,
            started: Instant::now(),
        }
    }

    fn attempts_allowed(&self) -> usize {
        self.max_attempts.max(1)
    }
}

/// What the driver should do after an attempt.
#[derive(Debug)]
pub enum RetryStep {
    /// The call is over: return this result to the caller.
    Done(Result<Response>),
    /// Sleep for this long, then issue the next attempt.
    Retry(Duration),
}

/// Retry bookkeeping for a single logical call.
///
/// Created by [`RetryPolicy::start`] and dropped when the call ends; never
/// shared between calls.
#[derive(Debug)]
pub struct RetryState<'a> {
    policy: &'a RetryPolicy,
    attempt: usize,
    started: Instant,
}

impl RetryState<'_> {
    /// The 0-based index of the current attempt.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Attempts made so far, counting the current one.
    pub fn attempts(&self) -> usize {
        self.attempt + 1
    }

    /// Time since the first attempt started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns `true` if the current attempt is the last one allowed.
    pub fn is_last_attempt(&self) -> bool {
        self.attempts() >= self.policy.attempts_allowed()
    }

    /// Decides what follows the result of the current attempt.
    ///
    /// Successes and non-retryable errors end the call. Retryable errors end
    /// it on the last attempt; otherwise the attempt counter advances and the
    /// returned delay is the server's `Retry-After` for rate limits, or the
    /// exponential backoff.
    pub fn next(&mut self, result: Result<Response>, request: &RequestMetadata) -> RetryStep {
        let error = match result {
            Ok(response) => return RetryStep::Done(Ok(response)),
            Err(error) => error,
        };

        tracing::warn!(
            error = %error,
            attempt = self.attempts(),
            max_attempts = self.policy.attempts_allowed(),
            method = %request.method,
            path = %request.path(),
            "Request failed"
        );

        if !error.is_retryable() || self.is_last_attempt() {
            return RetryStep::Done(Err(error));
        }

        let delay = match &error {
            Error::RateLimited {
                retry_after: Some(retry_after),
                ..
            } => {
                let delay = (*retry_after).min(self.policy.max_delay);
                tracing::info!(
                    rate_limit_delay_ms = delay.as_millis(),
                    attempt = self.attempts(),
                    "Rate limited - waiting before retry"
                );
                delay
            }
            _ => {
                let delay = self.policy.backoff(self.attempt);
                tracing::info!(
                    delay_ms = delay.as_millis(),
                    attempt = self.attempts(),
                    "Retrying request after delay"
                );
                delay
            }
        };

        self.attempt += 1;
        RetryStep::Retry(delay)
    }
}

//! Polling state machine for v2 asynchronous memory creation.
//!
//! `POST /v2/memories` returns as soon as the job is queued. Waiting for the
//! embedding to be generated means reading `GET /v2/memories/{id}/status`
//! until the job is `ready` or `failed`, or until the caller's deadline
//! passes. Like [`crate::retry`], this module decides; the clients do the I/O
//! and the sleeping.
//!
//! ```text
//!   pending ──► processing ──► ready   (fetch the memory)
//!      │            │
//!      └────────────┴────────► failed  (validation error)
//! ```
//!
//! A client-side timeout stops the waiting only; the server-side job keeps
//! running.

use crate::{types::JobStatus, Error};
use http::StatusCode;
use std::time::{Duration, Instant};

/// Deadline and polling cadence for `wait_for_ready`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollOptions {
    /// Give up once this much time has passed without a terminal status.
    pub timeout: Duration,
    /// Pause between status reads.
    pub poll_interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl PollOptions {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// What the driver should do after a status read.
#[derive(Debug)]
pub enum PollStep {
    /// The job is done: fetch the memory once and return it.
    Fetch,
    /// Sleep for this long, then read the status again.
    Wait(Duration),
    /// Stop polling and return this error.
    Fail(Error),
}

/// Deadline tracking for one wait.
#[derive(Debug, Clone)]
pub struct PollState {
    options: PollOptions,
    started: Instant,
    polls: usize,
}

impl PollState {
    /// Starts the clock now.
    pub fn new(options: PollOptions) -> Self {
        Self::starting_at(options, Instant::now())
    }

    /// Starts the clock at `started`, so that work done before polling (the
    /// create call, for `create_and_wait`) counts against the same budget.
    pub fn starting_at(options: PollOptions, started: Instant) -> Self {
        Self {
            options,
            started,
            polls: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of status reads observed so far.
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Decides what follows a status read for memory `id`.
    pub fn observe(&mut self, id: &str, status: &JobStatus, error: Option<&str>) -> PollStep {
        self.polls += 1;
        let elapsed = self.elapsed();

        tracing::debug!(
            memory_id = %id,
            status = %status,
            poll = self.polls,
            elapsed_ms = elapsed.as_millis(),
            "Polled memory status"
        );

        match status {
            JobStatus::Ready => PollStep::Fetch,
            JobStatus::Failed => {
                let message = match error {
                    Some(reason) => {
                        format!("Memory {} embedding generation failed: {}", id, reason)
                    }
                    None => format!("Memory {} embedding generation failed", id),
                };
                tracing::warn!(memory_id = %id, "Embedding generation failed");
                PollStep::Fail(Error::Validation {
                    message,
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    request_id: None,
                })
            }
            JobStatus::Pending | JobStatus::Processing | JobStatus::Unknown(_) => {
                if elapsed >= self.options.timeout {
                    tracing::warn!(
                        memory_id = %id,
                        elapsed_ms = elapsed.as_millis(),
                        timeout_ms = self.options.timeout.as_millis(),
                        "Gave up waiting for memory"
                    );
                    PollStep::Fail(Error::Timeout {
                        message: format!(
                            "Memory {} not ready after {:.1}s (timeout: {:.1}s)",
                            id,
                            elapsed.as_secs_f64(),
                            self.options.timeout.as_secs_f64()
                        ),
                    })
                } else {
                    PollStep::Wait(self.options.poll_interval)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PollOptions {
        PollOptions::new(Duration::from_secs(60), Duration::from_millis(10))
    }

    #[test]
    fn test_in_progress_statuses_wait() {
        let mut state = PollState::new(fast());

        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Unknown("queued".into()),
        ] {
            match state.observe("mem_1", &status, None) {
                PollStep::Wait(delay) => assert_eq!(delay, Duration::from_millis(10)),
                other => panic!("Expected Wait for {}, got {:?}", status, other),
            }
        }
        assert_eq!(state.polls(), 3);
    }

    #[test]
    fn test_ready_fetches() {
        let mut state = PollState::new(fast());
        assert!(matches!(
            state.observe("mem_1", &JobStatus::Ready, None),
            PollStep::Fetch
        ));
    }

    #[test]
    fn test_failed_is_validation_error() {
        let mut state = PollState::new(fast());

        match state.observe("mem_1", &JobStatus::Failed, Some("model unavailable")) {
            PollStep::Fail(err) => {
                assert_eq!(err.kind(), crate::ErrorKind::Validation);
                assert!(err.message().contains("embedding generation failed"));
                assert!(err.message().contains("model unavailable"));
            }
            other => panic!("Expected Fail, got {:?}", other),
        }
    }

    #[test]
    fn test_deadline_turns_wait_into_timeout() {
        let options = PollOptions::new(Duration::from_millis(500), Duration::from_millis(100));
        let mut state =
            PollState::starting_at(options, Instant::now() - Duration::from_millis(600));

        match state.observe("mem_1", &JobStatus::Pending, None) {
            PollStep::Fail(err) => {
                assert_eq!(err.kind(), crate::ErrorKind::Timeout);
                assert!(err.message().contains("not ready after"));
                assert!(err.message().contains("timeout: 0.5s"));
            }
            other => panic!("Expected Fail, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_status_wins_over_deadline() {
        let options = PollOptions::new(Duration::from_millis(1), Duration::from_millis(1));
        let mut state = PollState::starting_at(options, Instant::now() - Duration::from_secs(1));

        assert!(matches!(
            state.observe("mem_1", &JobStatus::Ready, None),
            PollStep::Fetch
        ));
    }
}

//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a single deadline
//! - Cover the full exchange: connect, send, and reading the response body
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the pending future is dropped on expiry
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The deadline elapsed before the wrapped future completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} exceeded")]
pub struct DeadlineExceeded(pub Duration);

/// A fixed per-call deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    duration: Duration,
}

impl Deadline {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Run `fut`, abandoning it once the deadline passes.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        tokio::time::timeout(self.duration, fut)
            .await
            .map_err(|_| DeadlineExceeded(self.duration))
    }
}

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};

/// One observation from a status check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    Pending,
}

/// Bounded, cancellable retry schedule for transcription status checks.
///
/// Replaces an unbounded sleep-and-retry loop: the interval grows by
/// `backoff` up to `max_interval`, the attempt count is capped, and every
/// wait races against the cancellation token. Exhaustion surfaces as
/// `TranscriptionTimeout`.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub base_interval: Duration,
    pub max_interval: Duration,
    pub backoff: f64,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            base_interval: Duration::from_secs(config.poll_interval_secs),
            max_interval: Duration::from_secs(config.poll_max_interval_secs),
            backoff: config.poll_backoff,
            max_attempts: config.poll_max_attempts,
        }
    }

    /// Run `check` until it reports `Ready`, sleeping between attempts.
    ///
    /// A check returning an error ends the poll immediately; no status
    /// check runs after the job has terminated.
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, mut check: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollOutcome<T>>>,
    {
        let mut delay = self.base_interval;

        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            match check().await? {
                PollOutcome::Ready(value) => return Ok(value),
                PollOutcome::Pending => {}
            }

            if attempt == self.max_attempts {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }

            delay = delay.mul_f64(self.backoff).min(self.max_interval);
        }

        Err(Error::TranscriptionTimeout {
            attempts: self.max_attempts,
        })
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

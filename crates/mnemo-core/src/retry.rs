//! Retry with exponential backoff for dependency calls.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use mnemo_types::config::RetrySettings;
use mnemo_types::error::MemoryError;

/// Retries a fallible async operation with exponential backoff.
///
/// The delay before attempt `n + 1` is `base_delay * 2^(n - 1)`, so with
/// the default 500ms base the sleeps run 500ms, 1s, 2s, ... When every
/// attempt fails, the error from the last attempt is returned unchanged.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(settings: &RetrySettings) -> Self {
        Self {
            // Zero attempts would mean never calling the operation.
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
        }
    }

    /// Run `operation` until it succeeds or attempts are exhausted.
    pub async fn run<T, F, Fut>(&self, label: &str, operation: F) -> Result<T, MemoryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MemoryError>>,
    {
        self.run_cancellable(label, operation, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but checks `cancel` before starting each
    /// new attempt. An attempt already in flight is allowed to finish;
    /// a cancelled token surfaces as [`MemoryError::Cancelled`] instead
    /// of the next retry.
    pub async fn run_cancellable<T, F, Fut>(
        &self,
        label: &str,
        mut operation: F,
        cancel: &CancellationToken,
    ) -> Result<T, MemoryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MemoryError>>,
    {
        let mut attempt = 1u32;
        loop {
            if cancel.is_cancelled() {
                return Err(MemoryError::Cancelled);
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.max_attempts => return Err(err),
                Err(err) => {
                    let delay = self.base_delay * 2u32.pow(attempt - 1);
                    warn!(
                        %label,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after failure"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(MemoryError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetrySettings::default())
    }
}

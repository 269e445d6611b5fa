//! Bounded retry for transient browser faults.
//!
//! The policy wraps exactly two operations in the system: browser-session
//! launch and full detail-record extraction for one token. Failure kinds
//! outside the transient set propagate immediately without retry.

use crate::config::RetrySettings;
use std::future::Future;
use std::time::Duration;

/// Fixed-delay retry policy with a bounded attempt count.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts before the error is re-raised
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with explicit values.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Create a policy from configuration.
    #[must_use]
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, Duration::from_millis(settings.delay_ms))
    }

    /// Run `op`, re-invoking it after `delay` while `is_transient` holds and
    /// attempts remain. The final failure is returned to the caller; errors
    /// outside the transient set fail fast.
    pub async fn run<T, E, Fut>(
        &self,
        label: &str,
        is_transient: fn(&E) -> bool,
        mut op: impl FnMut() -> Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !is_transient(&err) => {
                    tracing::warn!("{label} failed with non-retryable error: {err}");
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        "{label} crashed on attempt {attempt}/{}: {err}",
                        self.max_attempts
                    );
                    if attempt >= self.max_attempts {
                        tracing::warn!("{label} failed after {} attempts", self.max_attempts);
                        return Err(err);
                    }
                    tracing::info!("retrying {label}...");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

//! Exponential backoff executor.
//!
//! Runs an arbitrary fallible async operation until it succeeds or the
//! attempt budget is spent, doubling the delay after every failure.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts (initial call included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay after the first failed attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Attempt budget and delay schedule for [`retry_with_backoff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct RetryPolicy {
    /// Maximum number of attempts.
    max_attempts: u32,
    /// Delay after the first failure; doubled for each following one.
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and base delay.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Number of attempts the executor will make (never less than 1).
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }

    /// Base delay of the schedule.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait after the failed attempt with the given 0-based index.
    ///
    /// `base_delay * 2^attempt`, saturating at `Duration::MAX`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

/// Runs `operation` until it succeeds, at most `policy.max_attempts()` times.
///
/// Waits `policy.delay_for(i)` after failed attempt `i`, except after the
/// last one. The first success is returned immediately.
///
/// # Errors
///
/// Returns the error of the final attempt, unchanged, when every attempt
/// fails.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let next = attempt.saturating_add(1);
                if next >= max_attempts {
                    tracing::warn!(attempts = next, error = %err, "All attempts failed");
                    return Err(err);
                }

                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = next,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Attempt failed, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt = next;
            }
        }
    }
}

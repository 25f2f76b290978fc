//! Retry policy and exponential backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::sleeper::Sleeper;

/// Default number of attempts per message.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff base.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Bounded exponential-backoff retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// Create a policy. A ceiling of zero is raised to one attempt.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Total attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff base.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Wait after the failed attempt `attempt_index` (zero-based):
    /// `base_delay * 2^attempt_index`, saturating.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Check if another attempt follows `attempt_index`.
    #[must_use]
    pub const fn has_attempt_after(&self, attempt_index: u32) -> bool {
        attempt_index + 1 < self.max_attempts
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// `operation` receives the zero-based attempt index. Between attempts the
/// sleeper waits [`RetryPolicy::delay_for_attempt`]; there is no wait after
/// the final attempt. The last error is returned on exhaustion.
pub async fn retry_with_backoff<S, F, Fut, T, E>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut operation: F,
) -> Result<T, E>
where
    S: Sleeper,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !policy.has_attempt_after(attempt) {
                    return Err(e);
                }

                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "send attempt failed, retrying"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

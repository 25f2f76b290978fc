//! Rate limit policy.

use std::time::Duration;

/// Default admissions per window.
pub const DEFAULT_CAPACITY: u32 = 20;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Capacity and window for a sliding-window limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum admissions per key inside one window.
    pub capacity: u32,
    /// Length of the trailing window.
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(capacity: u32, window: Duration) -> Self {
        Self { capacity, window }
    }

    /// Create a policy of `capacity` admissions per minute.
    #[must_use]
    pub const fn per_minute(capacity: u32) -> Self {
        Self::new(capacity, DEFAULT_WINDOW)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.capacity, 20);
        assert_eq!(policy.window, Duration::from_millis(60_000));
    }

    #[test]
    fn test_per_minute() {
        let policy = RateLimitPolicy::per_minute(5);
        assert_eq!(policy.capacity, 5);
        assert_eq!(policy.window, DEFAULT_WINDOW);
    }
}

//! Sliding-window rate limiter.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitPolicy;
use crate::error::{RateLimitError, RateLimitResult};

/// Number of tracked keys above which idle keys are evicted.
pub const MAX_TRACKED_KEYS: usize = 1024;

/// Admission timestamps of one key, oldest first.
#[derive(Debug, Default)]
struct SlidingWindow {
    timestamps: VecDeque<Instant>,
}

impl SlidingWindow {
    /// Drop timestamps at or before `now - window`.
    fn prune(&mut self, now: Instant, window: Duration) {
        // Nothing can have expired if the cutoff predates the clock origin.
        let Some(cutoff) = now.checked_sub(window) else {
            return;
        };
        while self.timestamps.front().is_some_and(|t| *t <= cutoff) {
            self.timestamps.pop_front();
        }
    }

    fn try_admit(&mut self, now: Instant, policy: RateLimitPolicy) -> bool {
        self.prune(now, policy.window);
        if self.timestamps.len() < policy.capacity as usize {
            self.timestamps.push_back(now);
            true
        } else {
            false
        }
    }
}

/// Per-key sliding-window admission controller.
///
/// Check-and-record runs under one lock, so concurrent callers can never
/// both observe spare capacity and over-admit.
#[derive(Debug)]
pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    policy: RateLimitPolicy,
    clock: C,
    windows: Mutex<HashMap<String, SlidingWindow>>,
}

impl SlidingWindowLimiter<SystemClock> {
    /// Create a limiter on the system clock.
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    /// Create a limiter with a custom clock.
    #[must_use]
    pub fn with_clock(policy: RateLimitPolicy, clock: C) -> Self {
        Self {
            policy,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admit and record one event for `key` if capacity remains.
    ///
    /// Returns false without recording when the window is full.
    pub fn is_allowed(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut windows = self.windows.lock();

        if windows.len() >= MAX_TRACKED_KEYS && !windows.contains_key(key) {
            Self::evict_idle_locked(&mut windows, now, self.policy.window);
        }

        let window = windows.entry(key.to_owned()).or_default();
        let allowed = window.try_admit(now, self.policy);
        debug!(key, allowed, count = window.timestamps.len(), "rate limit check");
        allowed
    }

    /// Like [`is_allowed`](Self::is_allowed), but reports rejection as an error.
    ///
    /// # Errors
    ///
    /// Returns `RateLimitError::Exceeded` if the window is full.
    pub fn check(&self, key: &str) -> RateLimitResult<()> {
        if self.is_allowed(key) {
            Ok(())
        } else {
            Err(RateLimitError::Exceeded {
                key: key.to_owned(),
                capacity: self.policy.capacity,
                window: self.policy.window,
            })
        }
    }

    /// Admissions for `key` inside the current window.
    #[must_use]
    pub fn current_count(&self, key: &str) -> usize {
        let now = self.clock.now();
        let mut windows = self.windows.lock();
        windows.get_mut(key).map_or(0, |window| {
            window.prune(now, self.policy.window);
            window.timestamps.len()
        })
    }

    /// Remove keys with no admissions left inside the window.
    pub fn evict_idle(&self) {
        let now = self.clock.now();
        let mut windows = self.windows.lock();
        Self::evict_idle_locked(&mut windows, now, self.policy.window);
    }

    fn evict_idle_locked(windows: &mut HashMap<String, SlidingWindow>, now: Instant, window: Duration) {
        let before = windows.len();
        windows.retain(|_, w| {
            w.prune(now, window);
            !w.timestamps.is_empty()
        });
        debug!(evicted = before - windows.len(), "evicted idle rate limit keys");
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.windows.lock().len()
    }

    /// The policy this limiter enforces.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        self.policy
    }
}

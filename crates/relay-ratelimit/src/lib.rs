//! # relay-ratelimit
//!
//! Sliding-window admission control for outbound notifications.
//!
//! [`SlidingWindowLimiter`] answers "may one more message go to this
//! destination now?" for a capacity `C` over a trailing window `W`. Every
//! key keeps the timestamps of its recent admissions; expired entries are
//! pruned on each check, so the count is continuously recomputed instead of
//! reset on fixed boundaries.
//!
//! The limiter is an owned value: share it with `Arc` and inject it where
//! sends happen. Time comes from a [`Clock`], so tests drive it with a
//! [`ManualClock`].
//!
//! # Example
//!
//! ```rust
//! use relay_ratelimit::{ManualClock, RateLimitPolicy, SlidingWindowLimiter};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let policy = RateLimitPolicy::new(2, Duration::from_secs(60));
//! let limiter = SlidingWindowLimiter::with_clock(policy, clock.clone());
//!
//! assert!(limiter.is_allowed("chat"));
//! assert!(limiter.is_allowed("chat"));
//! assert!(!limiter.is_allowed("chat"));
//!
//! clock.advance(Duration::from_secs(60));
//! assert!(limiter.is_allowed("chat"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RateLimitPolicy;
pub use error::{RateLimitError, RateLimitResult};
pub use limiter::SlidingWindowLimiter;

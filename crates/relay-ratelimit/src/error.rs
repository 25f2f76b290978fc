//! Error types for rate limiting.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by admission checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// The key has used its capacity for the current window.
    #[error("rate limit exceeded for {key}: {capacity} per {window:?}")]
    Exceeded {
        /// The rate-limited key.
        key: String,
        /// Admissions allowed per window.
        capacity: u32,
        /// Window length.
        window: Duration,
    },
}

/// Result type for rate limit operations.
pub type RateLimitResult<T> = Result<T, RateLimitError>;

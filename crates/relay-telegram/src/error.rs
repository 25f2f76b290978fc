//! Error types for Telegram delivery.

use relay_ratelimit::RateLimitError;
use thiserror::Error;

/// Errors that can occur while delivering a message.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Bot token or chat id is missing.
    #[error("telegram is not configured: bot token or chat id missing")]
    NotConfigured,

    /// The destination has used its rate limit budget.
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    /// The request never produced a response (connect, timeout, proxy).
    #[error("request failed: {reason}")]
    Request {
        /// Transport error, with the URL stripped.
        reason: String,
    },

    /// The Bot API answered with a non-success status.
    #[error("telegram api returned {status}: {description}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The API's `description` or the status reason.
        description: String,
    },

    /// The proxy URL could not be used.
    #[error("invalid proxy url: {reason}")]
    InvalidProxy {
        /// Why the proxy was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build http client: {reason}")]
    Client {
        /// Builder error.
        reason: String,
    },
}

/// Result type for delivery operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

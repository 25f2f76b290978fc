//! Error types for the relay-alerts crate.

use thiserror::Error;

/// Errors that can occur while reading alert payloads.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The webhook body is not a valid Alertmanager payload.
    #[error("invalid webhook payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected.
        reason: String,
    },
}

impl From<serde_json::Error> for AlertError {
    // serde_json messages can quote payload values; keep only the position.
    fn from(err: serde_json::Error) -> Self {
        let kind = match err.classify() {
            serde_json::error::Category::Io => "io error",
            serde_json::error::Category::Syntax => "malformed json",
            serde_json::error::Category::Data => "unexpected shape",
            serde_json::error::Category::Eof => "unexpected end of input",
        };
        Self::InvalidPayload {
            reason: format!("{kind} at line {} column {}", err.line(), err.column()),
        }
    }
}

/// Result type for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;

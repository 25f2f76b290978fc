//! Error types for the relay server.

use std::net::SocketAddr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_alerts::AlertError;
use relay_telegram::NotifyError;
use serde::Serialize;
use thiserror::Error;

/// Body sent to webhook callers for any failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the relay server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The webhook body could not be parsed.
    #[error(transparent)]
    InvalidPayload(#[from] AlertError),

    /// The Telegram client could not be built.
    #[error("failed to build telegram client: {0}")]
    Notifier(#[from] NotifyError),

    /// Failed to bind a listener.
    #[error("failed to bind to {addr}: {source}")]
    BindFailed {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A listener stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl ErrorResponse {
    const fn internal() -> Self {
        Self {
            error: GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Generic 500 response. The cause is never included.
pub fn internal_error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal())).into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        internal_error_response()
    }
}

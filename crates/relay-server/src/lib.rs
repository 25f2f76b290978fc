//! # relay-server
//!
//! Alertmanager webhook receiver that forwards alerts to Telegram.
//!
//! ## Features
//!
//! - **Severity routing**: critical alerts are sent individually with
//!   sound, warnings as one silent group, everything else individually
//!   and silently
//! - **Rate limiting and retry**: delegated to `relay-telegram`
//! - **Prometheus metrics**: on the main port and a standalone listener
//! - **Graceful shutdown** on Ctrl-C and SIGTERM
//!
//! ## Example
//!
//! ```rust,no_run
//! use relay_server::{RelayConfig, RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), relay_server::ServerError> {
//!     let server = RelayServer::from_config(RelayConfig::default())?;
//!     server.serve().await
//! }
//! ```
//!
//! ## HTTP Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/webhook` | POST | Alertmanager webhook receiver |
//! | `/health` | GET | Liveness with current timestamp |
//! | `/metrics` | GET | Prometheus text exposition |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod secrets;
pub mod server;
pub mod state;

// Re-export main types
pub use config::{Cli, ConfigError, LogFormat, RelayConfig};
pub use dispatcher::{AlertDispatcher, DispatchSummary};
pub use error::{ServerError, ServerResult};
pub use routes::{create_metrics_router, create_router};
pub use secrets::resolve_secret;
pub use server::{RelayServer, shutdown_signal};
pub use state::AppState;

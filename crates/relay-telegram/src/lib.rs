//! # relay-telegram
//!
//! Delivery of rendered alert messages to a Telegram chat.
//!
//! [`TelegramClient`] performs the `sendMessage` call behind two gates:
//!
//! 1. the bot token and chat id must be configured
//! 2. the shared [`SlidingWindowLimiter`](relay_ratelimit::SlidingWindowLimiter)
//!    must admit the chat id
//!
//! Admitted messages are posted through a [`Transport`] and retried with
//! exponential backoff under a [`RetryPolicy`]. Backoff waits go through a
//! [`Sleeper`], so tests never wait on the wall clock.
//!
//! Callers that only need "deliver this" depend on the [`Notifier`] trait.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use relay_metrics::PrometheusRegistry;
//! use relay_ratelimit::{RateLimitPolicy, SlidingWindowLimiter};
//! use relay_telegram::{TelegramClient, TelegramConfig};
//!
//! # async fn run() -> relay_telegram::NotifyResult<()> {
//! let config = TelegramConfig::new()
//!     .with_bot_token("123:abc")
//!     .with_chat_id("-1001234");
//! let limiter = Arc::new(SlidingWindowLimiter::new(RateLimitPolicy::default()));
//! let metrics = PrometheusRegistry::new();
//!
//! let client = TelegramClient::from_config(config, limiter, metrics.message_metrics().clone())?;
//! let delivered = client.send("<b>hello</b>", false).await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod retry;
pub mod sleeper;
pub mod transport;

pub use client::{Notifier, TelegramClient};
pub use config::{DEFAULT_API_ROOT, TelegramConfig, api_base_url, send_message_url};
pub use error::{NotifyError, NotifyResult};
pub use payload::{OutboundMessage, PARSE_MODE_HTML, SendMessagePayload};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
pub use transport::{HttpTransport, Transport};

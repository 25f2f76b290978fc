//! Telegram client.

use std::future::Future;
use std::sync::Arc;

use relay_metrics::{MessageMetrics, SendOutcome};
use relay_ratelimit::{Clock, SlidingWindowLimiter, SystemClock};
use tracing::{debug, error, info, warn};

use crate::config::{TelegramConfig, send_message_url};
use crate::error::{NotifyError, NotifyResult};
use crate::payload::{OutboundMessage, SendMessagePayload};
use crate::retry::retry_with_backoff;
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::transport::{HttpTransport, Transport};

/// Delivers rendered messages.
pub trait Notifier: Send + Sync {
    /// Deliver `message`. Returns true if it was accepted downstream.
    fn deliver(&self, message: &OutboundMessage) -> impl Future<Output = bool> + Send;
}

/// Sends messages to one Telegram chat.
///
/// Every call counts exactly once in `telegram_messages_sent_total`,
/// regardless of how many attempts it took.
#[derive(Debug)]
pub struct TelegramClient<T: Transport = HttpTransport, S: Sleeper = TokioSleeper, C: Clock = SystemClock> {
    config: TelegramConfig,
    transport: T,
    sleeper: S,
    limiter: Arc<SlidingWindowLimiter<C>>,
    metrics: MessageMetrics,
}

impl TelegramClient {
    /// Build a client with an HTTP transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(
        config: TelegramConfig,
        limiter: Arc<SlidingWindowLimiter>,
        metrics: MessageMetrics,
    ) -> NotifyResult<Self> {
        let transport = HttpTransport::new(config.timeout, config.proxy.as_deref())?;

        if config.is_configured() {
            info!(
                chat_id = config.chat_id.as_deref().unwrap_or_default(),
                api_root = %config.api_root,
                max_attempts = config.retry.max_attempts(),
                "telegram client configured"
            );
        } else {
            warn!("telegram bot token or chat id not set, messages will not be delivered");
        }

        Ok(Self::with_parts(config, transport, TokioSleeper, limiter, metrics))
    }
}

impl<T: Transport, S: Sleeper, C: Clock> TelegramClient<T, S, C> {
    /// Assemble a client from explicit parts.
    #[must_use]
    pub const fn with_parts(
        config: TelegramConfig,
        transport: T,
        sleeper: S,
        limiter: Arc<SlidingWindowLimiter<C>>,
        metrics: MessageMetrics,
    ) -> Self {
        Self {
            config,
            transport,
            sleeper,
            limiter,
            metrics,
        }
    }

    /// The client's configuration.
    #[must_use]
    pub const fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Send `text` as HTML, optionally without notification sound.
    pub async fn send(&self, text: &str, silent: bool) -> bool {
        self.try_send(&OutboundMessage::new(text, silent)).await.is_ok()
    }

    /// Deliver `message`, reporting why it was not delivered.
    ///
    /// The same body is posted on every attempt.
    ///
    /// # Errors
    ///
    /// - `NotifyError::NotConfigured` if token or chat id is missing
    /// - `NotifyError::RateLimited` if the chat's window is full
    /// - the last attempt's error once retries are exhausted
    pub async fn try_send(&self, message: &OutboundMessage) -> NotifyResult<()> {
        let (Some(token), Some(chat_id)) = (self.config.bot_token.as_deref(), self.config.chat_id.as_deref())
        else {
            error!("telegram bot token or chat id not configured, dropping message");
            self.metrics.inc_sent(SendOutcome::Error);
            return Err(NotifyError::NotConfigured);
        };

        if let Err(e) = self.limiter.check(chat_id) {
            warn!(chat_id, error = %e, "rate limit exceeded, dropping message");
            self.metrics.inc_sent(SendOutcome::Error);
            return Err(e.into());
        }

        let url = send_message_url(&self.config.api_root, token);
        let payload = SendMessagePayload::new(chat_id, message);
        let transport = &self.transport;
        let (url, body) = (url.as_str(), &payload);

        let result = retry_with_backoff(&self.config.retry, &self.sleeper, move |attempt| {
            debug!(attempt = attempt + 1, silent = body.disable_notification, "posting message");
            transport.post(url, body)
        })
        .await;

        match result {
            Ok(()) => {
                info!(chat_id, silent = message.silent, "message sent to telegram");
                self.metrics.inc_sent(SendOutcome::Success);
                Ok(())
            }
            Err(e) => {
                error!(
                    chat_id,
                    attempts = self.config.retry.max_attempts(),
                    error = %e,
                    "failed to send message to telegram"
                );
                self.metrics.inc_sent(SendOutcome::Error);
                Err(e)
            }
        }
    }
}

impl<T: Transport, S: Sleeper, C: Clock> Notifier for TelegramClient<T, S, C> {
    async fn deliver(&self, message: &OutboundMessage) -> bool {
        self.try_send(message).await.is_ok()
    }
}

//! Telegram client configuration.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Public Bot API root.
pub const DEFAULT_API_ROOT: &str = "https://api.telegram.org";

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Telegram client.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot credential.
    pub bot_token: Option<String>,
    /// Destination chat.
    pub chat_id: Option<String>,
    /// Bot API root, without trailing slash.
    pub api_root: String,
    /// Outbound proxy for both HTTP and HTTPS.
    pub proxy: Option<String>,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry policy for failed attempts.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_root", &self.api_root)
            .field("proxy", &self.proxy.is_some())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_root: DEFAULT_API_ROOT.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl TelegramConfig {
    /// Create an unconfigured client configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bot token.
    #[must_use]
    pub fn with_bot_token(mut self, token: impl Into<String>) -> Self {
        self.bot_token = Some(token.into());
        self
    }

    /// Set the chat id.
    #[must_use]
    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    /// Set the API root.
    #[must_use]
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the outbound proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns true if both token and chat id are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

/// Base URL for bot methods: `{api_root}/bot{token}`.
#[must_use]
pub fn api_base_url(api_root: &str, bot_token: &str) -> String {
    format!("{}/bot{bot_token}", api_root.trim_end_matches('/'))
}

/// URL of the `sendMessage` method.
#[must_use]
pub fn send_message_url(api_root: &str, bot_token: &str) -> String {
    format!("{}/sendMessage", api_base_url(api_root, bot_token))
}

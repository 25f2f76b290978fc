//! Command-line and environment configuration.
//!
//! [`Cli`] is parsed once at startup and resolved into an immutable
//! [`RelayConfig`]. Every option can be given as a flag or through the
//! environment variable listed next to it.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use relay_alerts::DEFAULT_GROUP_LIMIT;
use relay_ratelimit::RateLimitPolicy;
use relay_telegram::{DEFAULT_API_ROOT, RetryPolicy, TelegramConfig};
use thiserror::Error;

use crate::secrets::resolve_secret;

/// Default webhook listener port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default standalone metrics listener port.
pub const DEFAULT_METRICS_PORT: u16 = 9091;

/// Errors found while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API root is not an http(s) URL.
    #[error("invalid telegram api url {url:?}: expected http:// or https://")]
    InvalidApiUrl {
        /// Rejected value.
        url: String,
    },

    /// The proxy URL has no scheme.
    #[error("invalid proxy url {proxy:?}: missing scheme")]
    InvalidProxy {
        /// Rejected value, credentials stripped.
        proxy: String,
    },

    /// A zero outbound timeout would fail every request.
    #[error("telegram timeout must be at least one second")]
    ZeroTimeout,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Alertmanager to Telegram relay.
#[derive(Parser, Debug, Clone)]
#[command(name = "alert-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// File containing the Telegram bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN_FILE")]
    pub bot_token_file: Option<PathBuf>,

    /// Destination chat id.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub chat_id: Option<String>,

    /// File containing the destination chat id.
    #[arg(long, env = "TELEGRAM_CHAT_ID_FILE")]
    pub chat_id_file: Option<PathBuf>,

    /// Outbound proxy for Telegram requests.
    #[arg(long, env = "HTTP_PROXY", hide_env_values = true)]
    pub proxy: Option<String>,

    /// Fallback proxy when no HTTP proxy is set.
    #[arg(long, env = "HTTPS_PROXY", hide = true, hide_env_values = true)]
    pub https_proxy: Option<String>,

    /// Bot API root URL.
    #[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_API_ROOT)]
    pub api_url: String,

    /// Attempts per message, including the first.
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Backoff base in milliseconds.
    #[arg(long, env = "RETRY_BASE_DELAY_MS", default_value_t = 1000)]
    pub retry_base_delay_ms: u64,

    /// Messages allowed per chat per minute.
    #[arg(long, env = "RATE_LIMIT_PER_MINUTE", default_value_t = 20)]
    pub rate_limit_per_minute: u32,

    /// Webhook listener port.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Standalone metrics listener port.
    #[arg(long, env = "METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Per-attempt Telegram request timeout in seconds.
    #[arg(long = "timeout-secs", env = "TELEGRAM_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Listen address for both listeners.
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    /// Alerts rendered in the grouped warning message.
    #[arg(long, env = "MAX_GROUPED_ALERTS", default_value_t = DEFAULT_GROUP_LIMIT)]
    pub max_grouped_alerts: usize,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Resolved relay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Telegram client settings.
    pub telegram: TelegramConfig,
    /// Per-chat send budget.
    pub rate_limit: RateLimitPolicy,
    /// Listen address for both listeners.
    pub bind_address: IpAddr,
    /// Webhook listener port.
    pub port: u16,
    /// Standalone metrics listener port.
    pub metrics_port: u16,
    /// Alerts rendered in the grouped warning message.
    pub max_grouped_alerts: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            rate_limit: RateLimitPolicy::default(),
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            max_grouped_alerts: DEFAULT_GROUP_LIMIT,
        }
    }
}

impl RelayConfig {
    /// Resolve parsed arguments, reading secret files as needed.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable API URL, proxy URL or timeout.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_url = cli.api_url.trim();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl {
                url: api_url.to_string(),
            });
        }
        if cli.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let proxy = cli
            .proxy
            .as_deref()
            .or(cli.https_proxy.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(proxy) = proxy {
            if !proxy.contains("://") {
                return Err(ConfigError::InvalidProxy {
                    proxy: redact_proxy(proxy),
                });
            }
        }

        let mut telegram = TelegramConfig::new()
            .with_api_root(api_url)
            .with_timeout(Duration::from_secs(cli.timeout_secs))
            .with_retry(RetryPolicy::new(
                cli.max_retries,
                Duration::from_millis(cli.retry_base_delay_ms),
            ));
        if let Some(token) = resolve_secret(
            "TELEGRAM_BOT_TOKEN",
            cli.bot_token.as_deref(),
            cli.bot_token_file.as_deref(),
        ) {
            telegram = telegram.with_bot_token(token);
        }
        if let Some(chat_id) = resolve_secret(
            "TELEGRAM_CHAT_ID",
            cli.chat_id.as_deref(),
            cli.chat_id_file.as_deref(),
        ) {
            telegram = telegram.with_chat_id(chat_id);
        }
        if let Some(proxy) = proxy {
            telegram = telegram.with_proxy(proxy);
        }

        Ok(Self {
            telegram,
            rate_limit: RateLimitPolicy::per_minute(cli.rate_limit_per_minute),
            bind_address: cli.bind_address,
            port: cli.port,
            metrics_port: cli.metrics_port,
            max_grouped_alerts: cli.max_grouped_alerts,
        })
    }

    /// Set the Telegram settings.
    #[must_use]
    pub fn with_telegram(mut self, telegram: TelegramConfig) -> Self {
        self.telegram = telegram;
        self
    }

    /// Set the rate limit policy.
    #[must_use]
    pub const fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }

    /// Set the listen address.
    #[must_use]
    pub const fn with_bind_address(mut self, addr: IpAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set both listener ports.
    #[must_use]
    pub const fn with_ports(mut self, port: u16, metrics_port: u16) -> Self {
        self.port = port;
        self.metrics_port = metrics_port;
        self
    }

    /// Set the grouped warning cap.
    #[must_use]
    pub const fn with_max_grouped_alerts(mut self, max: usize) -> Self {
        self.max_grouped_alerts = max;
        self
    }

    /// Webhook listener address.
    #[must_use]
    pub const fn webhook_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Metrics listener address.
    #[must_use]
    pub const fn metrics_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.metrics_port)
    }
}

/// Strip userinfo from a proxy URL for logging.
#[must_use]
pub fn redact_proxy(proxy: &str) -> String {
    let (scheme, rest) = proxy.split_once("://").unwrap_or(("", proxy));
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return proxy.to_string();
    };
    let host = &rest[at + 1..];
    if scheme.is_empty() {
        format!("***@{host}")
    } else {
        format!("{scheme}://***@{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use test_case::test_case;

    /// Parse with explicit values for every option the environment could set.
    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "alert-relay",
            "--api-url",
            DEFAULT_API_ROOT,
            "--max-retries",
            "3",
            "--retry-base-delay-ms",
            "1000",
            "--rate-limit-per-minute",
            "20",
            "--port",
            "8080",
            "--metrics-port",
            "9091",
            "--timeout-secs",
            "30",
            "--bind-address",
            "0.0.0.0",
            "--max-grouped-alerts",
            "5",
        ];
        args.extend_from_slice(extra);
        let mut cli = Cli::try_parse_from(args).unwrap();
        if !extra.contains(&"--bot-token") {
            cli.bot_token = None;
            cli.bot_token_file = None;
        }
        if !extra.contains(&"--chat-id") {
            cli.chat_id = None;
            cli.chat_id_file = None;
        }
        if !extra.contains(&"--proxy") {
            cli.proxy = None;
        }
        if !extra.contains(&"--https-proxy") {
            cli.https_proxy = None;
        }
        cli
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolves_defaults() {
        let config = RelayConfig::from_cli(&parse(&[])).unwrap();

        assert_eq!(config, RelayConfig::default());
        assert!(!config.telegram.is_configured());
        assert_eq!(config.rate_limit.capacity, 20);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.telegram.retry, RetryPolicy::default());
        assert_eq!(config.webhook_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.metrics_addr().to_string(), "0.0.0.0:9091");
    }

    #[test]
    fn resolves_explicit_values() {
        let cli = parse(&[
            "--bot-token",
            " 123:abc ",
            "--chat-id",
            "-100",
            "--proxy",
            "http://proxy:3128",
            "--api-url",
            "http://127.0.0.1:9000/",
            "--max-retries",
            "5",
            "--retry-base-delay-ms",
            "250",
            "--rate-limit-per-minute",
            "7",
            "--port",
            "18080",
            "--metrics-port",
            "19091",
            "--timeout-secs",
            "4",
            "--bind-address",
            "127.0.0.1",
            "--max-grouped-alerts",
            "2",
        ]);

        let config = RelayConfig::from_cli(&cli).unwrap();

        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram.chat_id.as_deref(), Some("-100"));
        assert_eq!(config.telegram.proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.telegram.api_root, "http://127.0.0.1:9000");
        assert_eq!(config.telegram.retry, RetryPolicy::new(5, Duration::from_millis(250)));
        assert_eq!(config.telegram.timeout, Duration::from_secs(4));
        assert_eq!(config.rate_limit, RateLimitPolicy::per_minute(7));
        assert_eq!(config.webhook_addr().to_string(), "127.0.0.1:18080");
        assert_eq!(config.metrics_addr().to_string(), "127.0.0.1:19091");
        assert_eq!(config.max_grouped_alerts, 2);
    }

    #[test]
    fn reads_secrets_from_files() {
        let mut token = tempfile::NamedTempFile::new().unwrap();
        writeln!(token, "file-token").unwrap();
        let mut chat = tempfile::NamedTempFile::new().unwrap();
        writeln!(chat, "-200").unwrap();

        let mut cli = parse(&[]);
        cli.bot_token_file = Some(token.path().to_path_buf());
        cli.chat_id_file = Some(chat.path().to_path_buf());

        let config = RelayConfig::from_cli(&cli).unwrap();

        assert_eq!(config.telegram.bot_token.as_deref(), Some("file-token"));
        assert_eq!(config.telegram.chat_id.as_deref(), Some("-200"));
    }

    #[test]
    fn https_proxy_is_fallback() {
        let cli = parse(&["--https-proxy", "http://secure-proxy:3128"]);
        let config = RelayConfig::from_cli(&cli).unwrap();
        assert_eq!(config.telegram.proxy.as_deref(), Some("http://secure-proxy:3128"));

        let cli = parse(&["--proxy", "http://a:1", "--https-proxy", "http://b:2"]);
        let config = RelayConfig::from_cli(&cli).unwrap();
        assert_eq!(config.telegram.proxy.as_deref(), Some("http://a:1"));
    }

    #[test]
    fn zero_retries_means_one_attempt() {
        let config = RelayConfig::from_cli(&parse(&["--max-retries", "0"])).unwrap();
        assert_eq!(config.telegram.retry.max_attempts(), 1);
    }

    #[test]
    fn rejects_bad_api_url() {
        let err = RelayConfig::from_cli(&parse(&["--api-url", "api.telegram.org"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = RelayConfig::from_cli(&parse(&["--timeout-secs", "0"])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTimeout);
    }

    #[test]
    fn rejects_proxy_without_scheme_and_redacts_it() {
        let err = RelayConfig::from_cli(&parse(&["--proxy", "user:pw@proxy:3128"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidProxy {
                proxy: "***@proxy:3128".to_string()
            }
        );
    }

    #[test]
    fn parses_log_format() {
        assert_eq!(parse(&["--log-format", "json"]).log_format, LogFormat::Json);
    }

    #[test_case("http://proxy:3128", "http://proxy:3128" ; "no credentials")]
    #[test_case("http://user:pw@proxy:3128", "http://***@proxy:3128" ; "user and password")]
    #[test_case("socks5://u@10.0.0.1:1080/path", "socks5://***@10.0.0.1:1080/path" ; "user only")]
    #[test_case("http://proxy:3128/a@b", "http://proxy:3128/a@b" ; "at sign in path")]
    fn redacts_proxy_credentials(input: &str, expected: &str) {
        assert_eq!(redact_proxy(input), expected);
    }
}

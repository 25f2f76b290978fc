//! HTTP transport for Bot API calls.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{NotifyError, NotifyResult};
use crate::payload::{ApiErrorBody, SendMessagePayload};

/// Posts one `sendMessage` body and reports whether it was accepted.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform a single attempt.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Request` when no response arrives and
    /// `NotifyError::Api` on a non-success status.
    fn post(&self, url: &str, payload: &SendMessagePayload) -> impl Future<Output = NotifyResult<()>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a per-request timeout and optional proxy.
    ///
    /// The proxy applies to both HTTP and HTTPS. Without one, proxy
    /// environment variables are ignored so configuration has one source.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::InvalidProxy` for an unusable proxy URL and
    /// `NotifyError::Client` if the client cannot be built.
    pub fn new(timeout: Duration, proxy: Option<&str>) -> NotifyResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        builder = match proxy {
            Some(url) => builder.proxy(reqwest::Proxy::all(url).map_err(|e| NotifyError::InvalidProxy {
                reason: e.to_string(),
            })?),
            None => builder.no_proxy(),
        };

        let client = builder.build().map_err(|e| NotifyError::Client {
            reason: e.to_string(),
        })?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn post(&self, url: &str, payload: &SendMessagePayload) -> NotifyResult<()> {
        // The URL embeds the bot token; keep it out of error text.
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Request {
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "telegram accepted message");
            return Ok(());
        }

        let description = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.description)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        Err(NotifyError::Api {
            status: status.as_u16(),
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_without_proxy() {
        assert!(HttpTransport::new(Duration::from_secs(30), None).is_ok());
    }

    #[test]
    fn test_builds_with_proxy() {
        assert!(HttpTransport::new(Duration::from_secs(30), Some("http://proxy.local:3128")).is_ok());
    }

    #[test]
    fn test_rejects_invalid_proxy() {
        let err = HttpTransport::new(Duration::from_secs(30), Some("not a url")).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidProxy { .. }));
    }

    #[tokio::test]
    async fn test_connection_error_hides_url() {
        let transport = HttpTransport::new(Duration::from_millis(500), None).unwrap();
        let payload = SendMessagePayload {
            chat_id: "1".to_string(),
            text: "x".to_string(),
            parse_mode: "HTML".to_string(),
            disable_notification: false,
        };

        // Port 9 (discard) on localhost is closed in test environments.
        let err = transport
            .post("http://127.0.0.1:9/botSECRET/sendMessage", &payload)
            .await
            .unwrap_err();

        assert!(matches!(err, NotifyError::Request { .. }));
        assert!(!err.to_string().contains("SECRET"));
    }
}

//! Prometheus metrics support for the alert relay.
//!
//! Metric names match what existing Grafana dashboards for the Telegram
//! webhook expect. Counters are registered without the `_total` suffix;
//! the text encoder appends it.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

/// Histogram buckets for whole-request webhook duration, in seconds.
pub const WEBHOOK_DURATION_BUCKETS: [f64; 6] = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Label set keyed by HTTP status code.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusCodeLabels {
    /// The response status code, e.g. `"200"` or `"500"`.
    pub status: String,
}

/// Label set keyed by send outcome.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabels {
    /// `"success"` or `"error"`.
    pub status: String,
}

/// Outcome of one Telegram send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendOutcome {
    /// The message was accepted by the API.
    Success,
    /// The message was not delivered.
    Error,
}

impl SendOutcome {
    /// Returns the outcome as a label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Webhook endpoint metrics.
#[derive(Clone)]
pub struct WebhookMetrics {
    /// Requests by response status code.
    requests_total: Family<StatusCodeLabels, Counter>,
    /// Requests that failed.
    errors_total: Counter,
    /// Whole-request processing time in seconds.
    request_duration_seconds: Histogram,
}

impl std::fmt::Debug for WebhookMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookMetrics")
            .field("errors_total", &self.errors_total.get())
            .finish_non_exhaustive()
    }
}

impl WebhookMetrics {
    /// Creates webhook metrics and registers them with the given registry.
    fn new(registry: &mut Registry) -> Self {
        let requests_total = Family::<StatusCodeLabels, Counter>::default();
        registry.register(
            "telegram_webhook_requests",
            "Total webhook requests",
            requests_total.clone(),
        );

        let errors_total = Counter::default();
        registry.register(
            "telegram_webhook_errors",
            "Total webhook errors",
            errors_total.clone(),
        );

        let request_duration_seconds = Histogram::new(WEBHOOK_DURATION_BUCKETS.iter().copied());
        registry.register(
            "telegram_webhook_request_duration_seconds",
            "Webhook request duration",
            request_duration_seconds.clone(),
        );

        Self {
            requests_total,
            errors_total,
            request_duration_seconds,
        }
    }

    /// Counts one request answered with `status`.
    pub fn inc_requests(&self, status: u16) {
        self.requests_total
            .get_or_create(&StatusCodeLabels {
                status: status.to_string(),
            })
            .inc();
    }

    /// Gets the request count for `status`.
    #[must_use]
    pub fn get_requests(&self, status: u16) -> u64 {
        self.requests_total
            .get_or_create(&StatusCodeLabels {
                status: status.to_string(),
            })
            .get()
    }

    /// Counts one failed request.
    pub fn inc_errors(&self) {
        self.errors_total.inc();
    }

    /// Gets the failed request count.
    #[must_use]
    pub fn get_errors(&self) -> u64 {
        self.errors_total.get()
    }

    /// Records a request duration.
    pub fn observe_duration(&self, duration: Duration) {
        self.request_duration_seconds.observe(duration.as_secs_f64());
    }
}

/// Telegram delivery metrics.
#[derive(Clone)]
pub struct MessageMetrics {
    /// Send outcomes.
    messages_sent_total: Family<OutcomeLabels, Counter>,
}

impl std::fmt::Debug for MessageMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageMetrics").finish_non_exhaustive()
    }
}

impl MessageMetrics {
    fn new(registry: &mut Registry) -> Self {
        let messages_sent_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "telegram_messages_sent",
            "Messages sent to Telegram",
            messages_sent_total.clone(),
        );

        Self {
            messages_sent_total,
        }
    }

    /// Counts one send outcome.
    pub fn inc_sent(&self, outcome: SendOutcome) {
        self.messages_sent_total
            .get_or_create(&OutcomeLabels {
                status: outcome.as_str().to_string(),
            })
            .inc();
    }

    /// Gets the count for an outcome.
    #[must_use]
    pub fn get_sent(&self, outcome: SendOutcome) -> u64 {
        self.messages_sent_total
            .get_or_create(&OutcomeLabels {
                status: outcome.as_str().to_string(),
            })
            .get()
    }
}

/// Central Prometheus metrics registry for the relay.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct PrometheusRegistry {
    /// The underlying prometheus-client registry.
    registry: Arc<RwLock<Registry>>,
    webhook_metrics: WebhookMetrics,
    message_metrics: MessageMetrics,
}

impl std::fmt::Debug for PrometheusRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusRegistry")
            .field("webhook_metrics", &self.webhook_metrics)
            .field("message_metrics", &self.message_metrics)
            .finish_non_exhaustive()
    }
}

impl Default for PrometheusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusRegistry {
    /// Creates a registry with all relay metrics registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let webhook_metrics = WebhookMetrics::new(&mut registry);
        let message_metrics = MessageMetrics::new(&mut registry);

        Self {
            registry: Arc::new(RwLock::new(registry)),
            webhook_metrics,
            message_metrics,
        }
    }

    /// Returns the webhook metrics.
    #[must_use]
    pub fn webhook_metrics(&self) -> &WebhookMetrics {
        &self.webhook_metrics
    }

    /// Returns the message metrics.
    #[must_use]
    pub fn message_metrics(&self) -> &MessageMetrics {
        &self.message_metrics
    }

    /// Encodes all metrics in Prometheus text format.
    #[must_use]
    pub fn encode(&self) -> String {
        let registry = self.registry.read();
        let mut buffer = String::new();
        if encode(&mut buffer, &registry).is_err() {
            tracing::error!("failed to encode prometheus metrics");
            return String::new();
        }
        buffer
    }

    /// Returns the Content-Type header value for Prometheus metrics.
    #[must_use]
    pub const fn content_type() -> &'static str {
        "text/plain; version=0.0.4; charset=utf-8"
    }
}

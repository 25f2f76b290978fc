//! # relay-metrics
//!
//! Prometheus metrics for the alert relay.
//!
//! A single [`PrometheusRegistry`] owns every metric. Components get cheap
//! clones of the metric groups they observe:
//!
//! - [`WebhookMetrics`]: request counter by status code, error counter and
//!   request duration histogram
//! - [`MessageMetrics`]: Telegram send outcomes
//!
//! Recording never fails and never influences control flow.
//!
//! # Example
//!
//! ```rust
//! use relay_metrics::{PrometheusRegistry, SendOutcome};
//!
//! let registry = PrometheusRegistry::new();
//! registry.webhook_metrics().inc_requests(200);
//! registry.message_metrics().inc_sent(SendOutcome::Success);
//!
//! let output = registry.encode();
//! assert!(output.contains("telegram_webhook_requests_total"));
//! assert!(output.contains("telegram_messages_sent_total"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod prometheus;

pub use prometheus::{
    MessageMetrics, OutcomeLabels, PrometheusRegistry, SendOutcome, StatusCodeLabels,
    WebhookMetrics, WEBHOOK_DURATION_BUCKETS,
};

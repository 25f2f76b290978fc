//! HTTP request handlers.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use relay_alerts::AlertBatch;
use relay_metrics::PrometheusRegistry;
use relay_telegram::Notifier;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info_span};

use crate::dispatcher::DispatchSummary;
use crate::error::{ServerResult, internal_error_response};
use crate::state::AppState;

/// Webhook success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Always `"success"`.
    pub status: String,
}

impl WebhookResponse {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Current time, RFC 3339.
    pub timestamp: String,
}

/// `POST /webhook`: parse an Alertmanager batch and dispatch it.
///
/// Duration is observed for every request. Failures are logged here and
/// answered with a generic 500.
pub async fn receive_webhook<N>(State(state): State<AppState<N>>, body: Bytes) -> Response
where
    N: Notifier + 'static,
{
    let started = Instant::now();
    let result = process_webhook(&state, &body).await;

    let metrics = state.metrics().webhook_metrics();
    metrics.observe_duration(started.elapsed());

    match result {
        Ok(_) => {
            metrics.inc_requests(StatusCode::OK.as_u16());
            Json(WebhookResponse::success()).into_response()
        }
        Err(e) => {
            error!(error = %e, "error processing webhook");
            metrics.inc_errors();
            metrics.inc_requests(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            e.into_response()
        }
    }
}

async fn process_webhook<N: Notifier>(state: &AppState<N>, body: &[u8]) -> ServerResult<DispatchSummary> {
    let batch = AlertBatch::from_json(body)?;

    let span = info_span!(
        "webhook",
        group_key = batch.group_key.as_deref().unwrap_or_default(),
        receiver = batch.receiver.as_deref().unwrap_or_default(),
        alerts = batch.len(),
    );

    Ok(state.dispatcher().dispatch(&batch).instrument(span).await)
}

/// `GET /health`.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn export_metrics(State(registry): State<PrometheusRegistry>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, PrometheusRegistry::content_type())],
        registry.encode(),
    )
}

/// Fallback for unknown paths on the webhook listener.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Fallback for unknown paths on the metrics listener.
pub async fn metrics_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Response for a panic caught while handling a request.
pub fn panic_response(registry: &PrometheusRegistry) -> Response {
    error!("request handler panicked");
    let metrics = registry.webhook_metrics();
    metrics.inc_errors();
    metrics.inc_requests(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
    internal_error_response()
}

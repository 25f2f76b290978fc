//! Router configuration for the webhook and metrics listeners.

use std::any::Any;

use axum::Router;
use axum::response::Response;
use axum::routing::{get, post};
use relay_metrics::PrometheusRegistry;
use relay_telegram::Notifier;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    export_metrics, health_check, metrics_not_found, not_found, panic_response, receive_webhook,
};
use crate::state::AppState;

/// Create the webhook listener router.
pub fn create_router<N: Notifier + 'static>(state: AppState<N>) -> Router {
    let registry = state.metrics().clone();

    Router::new()
        .route("/webhook", post(receive_webhook::<N>))
        .route("/health", get(health_check))
        .route("/metrics", get(export_metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(move |_: Box<dyn Any + Send + 'static>| -> Response {
            panic_response(&registry)
        }))
        .layer(TraceLayer::new_for_http())
}

/// Create the standalone metrics listener router.
pub fn create_metrics_router(registry: PrometheusRegistry) -> Router {
    Router::new()
        .route("/metrics", get(export_metrics))
        .fallback(metrics_not_found)
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
}

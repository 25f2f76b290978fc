//! Shared state for the relay routers.

use std::sync::Arc;

use axum::extract::FromRef;
use relay_metrics::PrometheusRegistry;

use crate::dispatcher::AlertDispatcher;

/// State shared by all webhook requests.
pub struct AppState<N> {
    dispatcher: Arc<AlertDispatcher<N>>,
    metrics: PrometheusRegistry,
}

impl<N> AppState<N> {
    /// Create the state.
    #[must_use]
    pub fn new(dispatcher: AlertDispatcher<N>, metrics: PrometheusRegistry) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            metrics,
        }
    }

    /// The alert dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &AlertDispatcher<N> {
        &self.dispatcher
    }

    /// The metrics registry.
    #[must_use]
    pub const fn metrics(&self) -> &PrometheusRegistry {
        &self.metrics
    }
}

impl<N> Clone for AppState<N> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            metrics: self.metrics.clone(),
        }
    }
}

impl<N> std::fmt::Debug for AppState<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl<N> FromRef<AppState<N>> for PrometheusRegistry {
    fn from_ref(state: &AppState<N>) -> Self {
        state.metrics.clone()
    }
}

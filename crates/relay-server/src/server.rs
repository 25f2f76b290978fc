//! Relay server: webhook and metrics listeners.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;

use relay_metrics::PrometheusRegistry;
use relay_ratelimit::SlidingWindowLimiter;
use relay_telegram::{Notifier, TelegramClient};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::{RelayConfig, redact_proxy};
use crate::dispatcher::AlertDispatcher;
use crate::error::{ServerError, ServerResult};
use crate::routes::{create_metrics_router, create_router};
use crate::state::AppState;

/// Serves `POST /webhook`, `GET /health` and `GET /metrics` on the main
/// port, plus a standalone `GET /metrics` listener.
#[derive(Debug)]
pub struct RelayServer<N> {
    config: RelayConfig,
    state: AppState<N>,
}

impl RelayServer<TelegramClient> {
    /// Build a server that delivers through Telegram.
    ///
    /// # Errors
    ///
    /// Returns an error if the Telegram HTTP client cannot be built.
    pub fn from_config(config: RelayConfig) -> ServerResult<Self> {
        let registry = PrometheusRegistry::new();
        let limiter = Arc::new(SlidingWindowLimiter::new(config.rate_limit));
        let client = TelegramClient::from_config(
            config.telegram.clone(),
            limiter,
            registry.message_metrics().clone(),
        )?;

        if let Some(proxy) = config.telegram.proxy.as_deref() {
            info!(proxy = %redact_proxy(proxy), "using outbound proxy");
        }

        let dispatcher = AlertDispatcher::new(client).with_group_limit(config.max_grouped_alerts);
        Ok(Self::new(config, AppState::new(dispatcher, registry)))
    }
}

impl<N: Notifier + 'static> RelayServer<N> {
    /// Create a server from prepared state.
    #[must_use]
    pub const fn new(config: RelayConfig, state: AppState<N>) -> Self {
        Self { config, state }
    }

    /// The server configuration.
    #[must_use]
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The shared request state.
    #[must_use]
    pub const fn state(&self) -> &AppState<N> {
        &self.state
    }

    /// Create the webhook router without starting a listener.
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }

    /// Create the metrics router without starting a listener.
    pub fn metrics_router(&self) -> axum::Router {
        create_metrics_router(self.state.metrics().clone())
    }

    /// Bind both listeners and serve until Ctrl-C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if either address cannot be bound.
    pub async fn serve(&self) -> ServerResult<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Bind both listeners and serve until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if either address cannot be bound.
    pub async fn serve_with_shutdown<F>(&self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let webhook = bind(self.config.webhook_addr()).await?;
        let metrics = bind(self.config.metrics_addr()).await?;
        self.serve_listeners(webhook, metrics, shutdown).await
    }

    /// Serve on already bound listeners until `shutdown` completes.
    ///
    /// Both listeners stop together and drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener fails.
    pub async fn serve_listeners<F>(
        &self,
        webhook: TcpListener,
        metrics: TcpListener,
        shutdown: F,
    ) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        log_listening("webhook", &webhook);
        log_listening("metrics", &metrics);

        let (stop_tx, stop_rx) = watch::channel(false);

        let webhook_server = axum::serve(webhook, self.router())
            .with_graceful_shutdown(wait_for_stop(stop_rx.clone()))
            .into_future();
        let metrics_server = axum::serve(metrics, self.metrics_router())
            .with_graceful_shutdown(wait_for_stop(stop_rx))
            .into_future();
        let trigger = async move {
            shutdown.await;
            let _ = stop_tx.send(true);
        };

        let (webhook_result, metrics_result, ()) = tokio::join!(webhook_server, metrics_server, trigger);
        webhook_result.map_err(ServerError::Serve)?;
        metrics_result.map_err(ServerError::Serve)?;

        info!("relay server shut down");
        Ok(())
    }
}

async fn bind(addr: SocketAddr) -> ServerResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::BindFailed { addr, source })
}

fn log_listening(name: &str, listener: &TcpListener) {
    match listener.local_addr() {
        Ok(addr) => info!(listener = name, addr = %addr, "listening"),
        Err(e) => error!(listener = name, error = %e, "listener has no local address"),
    }
}

async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    // A dropped sender also means stop.
    let _ = stop.wait_for(|stopped| *stopped).await;
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}

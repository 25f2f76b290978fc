//! `alert-relay` binary.
//!
//! Reads configuration from flags and environment, then serves the webhook
//! and metrics listeners until Ctrl-C or SIGTERM.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use relay_server::{Cli, LogFormat, RelayConfig, RelayServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format_args!("{e:#}"), "alert relay failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = RelayConfig::from_cli(cli).context("invalid configuration")?;

    info!(
        webhook_addr = %config.webhook_addr(),
        metrics_addr = %config.metrics_addr(),
        rate_limit_per_minute = config.rate_limit.capacity,
        max_attempts = config.telegram.retry.max_attempts(),
        "starting alert relay"
    );

    let server = RelayServer::from_config(config).context("failed to initialise relay")?;
    server.serve().await.context("relay server stopped with an error")?;
    Ok(())
}

//! wages-http - salary calculator web service
//!
//! Serves the upload page at `/` and computes salaries for timesheets posted
//! to `/calculate`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wages_common::config::{load_config, ConfigSource};
use wages_http::{build_router, AppState};

/// Command-line arguments for wages-http
#[derive(Parser, Debug)]
#[command(name = "wages-http")]
#[command(about = "Monthly salary calculator web service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides [server].port)
    #[arg(short, long, env = "WAGES_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides [server].bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// Configuration file
    #[arg(short, long, env = "WAGES_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded before tracing so the configured level applies; the source is logged below
    let (config, source) = load_config(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting wages-http v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &source {
        ConfigSource::Missing(_) => warn!("Configuration: {}", source),
        _ => info!("Configuration: {}", source),
    }

    let settings = config
        .calculator_settings()
        .context("Invalid [calculator] configuration")?;
    info!(
        "Time zone {}, base rate {} cents/h, {} regular rate periods, {} overtime levels",
        settings.time_zone,
        settings.base_rate_by_100,
        settings.regular_rates.len(),
        settings.overtime_levels.len()
    );

    let state = AppState::new(settings, config.csv.fields.clone());
    let app = build_router(state, config.server.max_upload_bytes);

    let bind = args.bind.unwrap_or(config.server.bind);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("wages-http listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    info!("Received {}, shutting down", received);
}

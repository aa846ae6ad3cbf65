//! stringsvc — Entry Point
//!
//! Initializes configuration and logging, composes the service chain
//! and serves it over HTTP until SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load config.toml (or `$STRINGSVC_CONFIG`) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Build the Prometheus registry (if metrics are enabled)
//! 4. Compose the middleware stack around the core `Strings` service
//! 5. Spawn the metrics server
//! 6. Spawn the API server (/uppercase, /count, /live, /ready)
//! 7. Wait for SIGINT/SIGTERM → readiness off → drain → exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{error, info};

use stringsvc::adapters::http::{ApiServer, Endpoints};
use stringsvc::adapters::metrics::{HealthState, MetricsRegistry};
use stringsvc::config;
use stringsvc::domain::Strings;
use stringsvc::middleware::{self, LayerDeps};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&config::loader::config_path())
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        layers = ?config.middleware.layers,
        "Starting string service"
    );

    // ── 3. Metrics registry ─────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new(&config.metrics).context("Failed to create metrics registry")?,
        ))
    } else {
        None
    };

    // ── 4. Compose the service chain ────────────────────────
    let deps = LayerDeps {
        collectors: metrics.as_ref().map(|m| m.collectors()),
        log_sink: None,
    };
    let svc = middleware::compose(Strings::new(), &config.middleware.layers, &deps)
        .context("Failed to compose middleware")?;
    let endpoints = Endpoints::new(Arc::from(svc));

    // ── 5. Shutdown signal + health state ───────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = HealthState::new();

    // ── 6. Spawn metrics server ─────────────────────────────
    let metrics_handle = metrics.map(|registry| {
        let bind = config.metrics.bind_address.clone();
        let rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = registry.serve(bind, rx).await {
                error!(error = %e, "Metrics server failed");
            }
        })
    });

    // ── 7. Spawn API server ─────────────────────────────────
    let api = ApiServer::new(endpoints, health.clone(), config.server.bind_address.clone());
    let api_rx = shutdown_tx.subscribe();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api.run(api_rx).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 8. Wait for SIGINT or SIGTERM ───────────────────────
    wait_for_signal().await;

    // ── Graceful shutdown ───────────────────────────────────
    health.mark_shutting_down();
    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    let _ = tokio::time::timeout(Duration::from_secs(30), api_handle).await;
    if let Some(handle) = metrics_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received, initiating graceful shutdown"),
        () = terminate => info!("SIGTERM received, initiating graceful shutdown"),
    }
}

//! Prometheus Metrics Registry - String Service Observability
//!
//! Owns the collectors behind the instrumenting middleware and exposes
//! them in Prometheus text format on their own listener.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};

use crate::config::MetricsConfig;
use crate::middleware::Collectors;
use crate::ports::metrics::{Counter, Histogram, Labels};

/// Labels carried by the per-call series, in declaration order.
pub const CALL_LABELS: [&str; 2] = ["method", "error"];

/// Centralized Prometheus metrics for the string service.
///
/// Metric names are `<namespace>_<subsystem>_*` as configured.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Calls per method and error flag.
    pub request_count: IntCounterVec,
    /// Call latency in seconds per method and error flag.
    pub request_latency: HistogramVec,
    /// Distribution of `count` results.
    pub count_result: prometheus::Histogram,
}

impl MetricsRegistry {
    /// Create and register all collectors.
    pub fn new(config: &MetricsConfig) -> anyhow::Result<Self> {
        let registry = Registry::new();

        let request_count = IntCounterVec::new(
            Opts::new("request_count", "Number of requests received")
                .namespace(config.namespace.as_str())
                .subsystem(config.subsystem.as_str()),
            &CALL_LABELS,
        )?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new(
                "request_latency_seconds",
                "Total duration of requests in seconds",
            )
            .namespace(config.namespace.as_str())
            .subsystem(config.subsystem.as_str())
            .buckets(
                config
                    .latency_buckets
                    .clone()
                    .unwrap_or_else(|| prometheus::DEFAULT_BUCKETS.to_vec()),
            ),
            &CALL_LABELS,
        )?;

        let count_buckets = match &config.count_buckets {
            Some(buckets) => buckets.clone(),
            None => prometheus::exponential_buckets(1.0, 2.0, 12)?,
        };
        let count_result = prometheus::Histogram::with_opts(
            HistogramOpts::new("count_result", "The result of each count method")
                .namespace(config.namespace.as_str())
                .subsystem(config.subsystem.as_str())
                .buckets(count_buckets),
        )?;

        registry.register(Box::new(request_count.clone()))?;
        registry.register(Box::new(request_latency.clone()))?;
        registry.register(Box::new(count_result.clone()))?;

        Ok(Self {
            registry,
            request_count,
            request_latency,
            count_result,
        })
    }

    /// Handles for the instrumenting middleware, sharing this registry's series.
    pub fn collectors(&self) -> Collectors {
        Collectors {
            request_count: Arc::new(self.request_count.clone()),
            request_latency: Arc::new(self.request_latency.clone()),
            count_result: Arc::new(self.count_result.clone()),
        }
    }

    /// Encode every registered metric in the text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output is not UTF-8")
    }

    /// Router exposing `GET /metrics`.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&self);
                async move {
                    match metrics.render() {
                        Ok(body) => (StatusCode::OK, body).into_response(),
                        Err(e) => {
                            error!(error = %e, "Failed to render metrics");
                            StatusCode::INTERNAL_SERVER_ERROR.into_response()
                        }
                    }
                }
            }),
        )
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {bind_address}"))?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

fn label_map<'a>(labels: Labels<'a>) -> HashMap<&'a str, &'a str> {
    labels.iter().copied().collect()
}

impl Counter for IntCounterVec {
    fn add(&self, labels: Labels<'_>, delta: u64) {
        match self.get_metric_with(&label_map(labels)) {
            Ok(counter) => counter.inc_by(delta),
            Err(e) => warn!(error = %e, ?labels, "Dropped counter increment"),
        }
    }
}

impl Histogram for HistogramVec {
    fn observe(&self, labels: Labels<'_>, value: f64) {
        match self.get_metric_with(&label_map(labels)) {
            Ok(histogram) => histogram.observe(value),
            Err(e) => warn!(error = %e, ?labels, "Dropped histogram observation"),
        }
    }
}

impl Histogram for prometheus::Histogram {
    fn observe(&self, _labels: Labels<'_>, value: f64) {
        Self::observe(self, value);
    }
}

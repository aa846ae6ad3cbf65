//! Health Check Routes - Liveness and Readiness Probes
//!
//! `/live` and `/ready` for container health checks. Readiness drops to
//! 503 as soon as graceful shutdown begins so load balancers drain first.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Shared health state polled by readiness probes.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Whether the service accepts traffic.
    ready: Arc<AtomicBool>,
}

impl HealthState {
    /// Create a new health state (ready by default).
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Check if the service is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Flip readiness off; called when shutdown starts.
    pub fn mark_shutting_down(&self) {
        self.ready.store(false, Ordering::Relaxed);
    }

    /// Router exposing `/live` and `/ready` over this state.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/live", get(liveness))
            .route("/ready", get(readiness))
            .with_state(self.clone())
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 503 once shutdown has begun.
async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

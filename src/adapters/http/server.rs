//! API Server - axum Routes over the Endpoints
//!
//! Decodes JSON bodies, builds the per-request context and encodes the
//! endpoint responses. Malformed bodies are rejected with 400 before
//! the service chain is reached.

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::endpoints::Endpoints;
use super::types::{
    CountRequest, CountResponse, ErrorBody, UppercaseRequest, UppercaseResponse,
};
use crate::adapters::metrics::HealthState;
use crate::ports::string_service::RequestContext;

/// Header carrying a caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The body was not valid JSON for the route.
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(error = %self, "Rejected request");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// HTTP server for the string API and health probes.
pub struct ApiServer {
    endpoints: Endpoints,
    health: HealthState,
    bind_address: String,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(endpoints: Endpoints, health: HealthState, bind_address: String) -> Self {
        Self {
            endpoints,
            health,
            bind_address,
        }
    }

    /// All routes: `/uppercase`, `/count`, `/live`, `/ready`.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/uppercase", post(uppercase))
            .route("/count", post(count))
            .with_state(self.endpoints.clone())
            .merge(self.health.router())
    }

    /// Serve until `shutdown_rx` fires, then drain in-flight requests.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&self.bind_address)
            .await
            .with_context(|| format!("Failed to bind API listener on {}", self.bind_address))?;
        info!(address = %self.bind_address, "API server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

/// Use the caller's request id when it is a valid UUID, otherwise mint one.
fn request_context(headers: &HeaderMap) -> RequestContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .map_or_else(RequestContext::new, RequestContext::with_id)
}

async fn uppercase(
    State(endpoints): State<Endpoints>,
    headers: HeaderMap,
    body: Result<Json<UppercaseRequest>, JsonRejection>,
) -> Result<Json<UppercaseResponse>, ApiError> {
    let Json(req) = body?;
    let ctx = request_context(&headers);
    Ok(Json(endpoints.uppercase(&ctx, req)))
}

async fn count(
    State(endpoints): State<Endpoints>,
    headers: HeaderMap,
    body: Result<Json<CountRequest>, JsonRejection>,
) -> Result<Json<CountResponse>, ApiError> {
    let Json(req) = body?;
    let ctx = request_context(&headers);
    Ok(Json(endpoints.count(&ctx, req)))
}

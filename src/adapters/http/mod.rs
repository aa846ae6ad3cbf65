//! HTTP JSON Transport Adapter
//!
//! Binds `POST /uppercase` and `POST /count` to the service chain.
//!
//! Sub-modules:
//! - `types`: request/response bodies
//! - `endpoints`: transport-agnostic request → service call → response
//! - `server`: axum router, handlers and listener

pub mod endpoints;
pub mod server;
pub mod types;

pub use endpoints::Endpoints;
pub use server::{ApiError, ApiServer};

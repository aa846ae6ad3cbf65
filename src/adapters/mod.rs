//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Connects the service chain to the outside world.
//!
//! Adapter categories:
//! - `http`: axum JSON API for `uppercase` and `count`
//! - `metrics`: Prometheus collectors/export and health probes

pub mod http;
pub mod metrics;

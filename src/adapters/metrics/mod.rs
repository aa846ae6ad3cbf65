//! Metrics and Monitoring Adapters
//!
//! Prometheus collectors and their `/metrics` exporter, plus the
//! `/live` and `/ready` probes.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use self::prometheus::MetricsRegistry;

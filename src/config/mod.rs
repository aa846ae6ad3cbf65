//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Listener
//! addresses, metric naming and the middleware stack are all
//! externalized here.

pub mod loader;

use serde::Deserialize;

use crate::middleware::Layer;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before any listener is bound.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// API server settings.
  pub server: ServerConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
  /// Decorator stack around the core service.
  #[serde(default)]
  pub middleware: MiddlewareConfig,
}

/// API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// API bind address.
  #[serde(default = "default_bind_addr")]
  pub bind_address: String,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable Prometheus collectors and export.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Metric name namespace (first prefix).
  #[serde(default = "default_namespace")]
  pub namespace: String,
  /// Metric name subsystem (second prefix).
  #[serde(default = "default_subsystem")]
  pub subsystem: String,
  /// Latency histogram buckets in seconds; prometheus defaults if absent.
  pub latency_buckets: Option<Vec<f64>>,
  /// `count` result histogram buckets; powers of two if absent.
  pub count_buckets: Option<Vec<f64>>,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: default_true(),
      bind_address: default_metrics_addr(),
      namespace: default_namespace(),
      subsystem: default_subsystem(),
      latency_buckets: None,
      count_buckets: None,
    }
  }
}

/// Middleware stack configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MiddlewareConfig {
  /// Layers wrapping the core, outermost first.
  #[serde(default = "default_layers")]
  pub layers: Vec<Layer>,
}

impl Default for MiddlewareConfig {
  fn default() -> Self {
    Self {
      layers: default_layers(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "stringsvc".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_addr() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
  true
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_namespace() -> String {
  "my_group".to_string()
}

fn default_subsystem() -> String {
  "string_service".to_string()
}

fn default_layers() -> Vec<Layer> {
  vec![Layer::Logging, Layer::Instrumenting]
}

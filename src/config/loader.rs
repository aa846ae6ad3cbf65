//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{AppConfig, MetricsConfig};
use crate::middleware::Layer;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "STRINGSVC_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Resolve the config path from the environment.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.server.name,
    layers = ?config.middleware.layers,
    metrics = config.metrics.enabled,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty bind addresses
/// - Metric name fragments Prometheus accepts
/// - Strictly increasing histogram buckets
/// - A middleware stack without repeats, with metrics when instrumenting
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.server.bind_address.is_empty(),
    "server.bind_address must not be empty"
  );

  validate_metrics(&config.metrics)?;

  let mut seen = HashSet::new();
  for layer in &config.middleware.layers {
    anyhow::ensure!(
      seen.insert(*layer),
      "middleware layer `{layer}` is listed more than once"
    );
  }

  anyhow::ensure!(
    !config.middleware.layers.contains(&Layer::Instrumenting) || config.metrics.enabled,
    "middleware layer `instrumenting` requires metrics.enabled = true"
  );

  Ok(())
}

fn validate_metrics(metrics: &MetricsConfig) -> Result<()> {
  if !metrics.enabled {
    return Ok(());
  }

  anyhow::ensure!(
    !metrics.bind_address.is_empty(),
    "metrics.bind_address must not be empty"
  );
  anyhow::ensure!(
    is_metric_fragment(&metrics.namespace),
    "metrics.namespace `{}` is not a valid metric name fragment",
    metrics.namespace
  );
  anyhow::ensure!(
    is_metric_fragment(&metrics.subsystem),
    "metrics.subsystem `{}` is not a valid metric name fragment",
    metrics.subsystem
  );

  for (name, buckets) in [
    ("latency_buckets", &metrics.latency_buckets),
    ("count_buckets", &metrics.count_buckets),
  ] {
    if let Some(buckets) = buckets {
      anyhow::ensure!(!buckets.is_empty(), "metrics.{name} must not be empty");
      anyhow::ensure!(
        buckets.windows(2).all(|w| w[0] < w[1]),
        "metrics.{name} must be strictly increasing, got {buckets:?}"
      );
    }
  }

  Ok(())
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_metric_fragment(s: &str) -> bool {
  let mut chars = s.chars();
  chars
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

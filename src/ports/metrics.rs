//! Metrics Port - Collector Interfaces
//!
//! The instrumentation middleware records through these traits and never
//! touches a registry directly. Implementors own their synchronization:
//! concurrent `add`/`observe` calls must never lose an update.

/// Label pairs partitioning a metric, e.g. `[("method", "count")]`.
pub type Labels<'a> = &'a [(&'a str, &'a str)];

/// A monotonically increasing metric keyed by a label set.
pub trait Counter: Send + Sync {
  /// Add `delta` to the series selected by `labels`.
  fn add(&self, labels: Labels<'_>, delta: u64);
}

/// A metric accumulating observations for later summarization.
pub trait Histogram: Send + Sync {
  /// Record `value` in the series selected by `labels`.
  ///
  /// Untagged histograms are observed with an empty label slice.
  fn observe(&self, labels: Labels<'_>, value: f64);
}

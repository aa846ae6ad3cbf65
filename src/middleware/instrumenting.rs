//! Instrumenting Middleware - Request Counts, Latency, Result Sizes
//!
//! Records into injected collectors after every wrapped call:
//! - `request_count{method, error}` incremented by 1
//! - `request_latency_seconds{method, error}` observes elapsed seconds
//! - `count_result` (untagged) observes the value returned by `count`

use std::sync::Arc;
use std::time::Instant;

use crate::domain::error::StringError;
use crate::ports::metrics::{Counter, Histogram};
use crate::ports::string_service::{RequestContext, StringService};

/// Method label value for `uppercase`.
pub const METHOD_UPPERCASE: &str = "uppercase";
/// Method label value for `count`.
pub const METHOD_COUNT: &str = "count";

/// The collectors an [`InstrumentingMiddleware`] writes to.
///
/// Built once at start-up and cloned into each instrumented chain; all
/// clones share the same underlying series.
#[derive(Clone)]
pub struct Collectors {
    /// Calls per `(method, error)`.
    pub request_count: Arc<dyn Counter>,
    /// Call latency in seconds per `(method, error)`.
    pub request_latency: Arc<dyn Histogram>,
    /// Values returned by `count`.
    pub count_result: Arc<dyn Histogram>,
}

impl std::fmt::Debug for Collectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collectors").finish_non_exhaustive()
    }
}

/// Decorator aggregating call metrics without altering outcomes.
pub struct InstrumentingMiddleware<S> {
    next: S,
    collectors: Collectors,
}

impl<S: StringService> InstrumentingMiddleware<S> {
    /// Wrap `next`, recording into `collectors`.
    pub const fn new(next: S, collectors: Collectors) -> Self {
        Self { next, collectors }
    }

    fn record(&self, method: &str, failed: bool, started: Instant) {
        let error = if failed { "true" } else { "false" };
        let labels = [("method", method), ("error", error)];
        self.collectors.request_count.add(&labels, 1);
        self.collectors
            .request_latency
            .observe(&labels, started.elapsed().as_secs_f64());
    }
}

impl<S: StringService> StringService for InstrumentingMiddleware<S> {
    fn uppercase(&self, ctx: &RequestContext, text: &str) -> Result<String, StringError> {
        let started = Instant::now();
        let result = self.next.uppercase(ctx, text);
        self.record(METHOD_UPPERCASE, result.is_err(), started);
        result
    }

    #[allow(clippy::cast_precision_loss)]
    fn count(&self, ctx: &RequestContext, text: &str) -> usize {
        let started = Instant::now();
        let n = self.next.count(ctx, text);
        self.record(METHOD_COUNT, false, started);
        self.collectors.count_result.observe(&[], n as f64);
        n
    }
}

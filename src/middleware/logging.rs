//! Logging Middleware - One Structured Record per Call
//!
//! Emits a `tracing` event on the `stringsvc::calls` target after the
//! wrapped call returns. Never alters the result.

use std::time::Instant;

use tracing::{Dispatch, info};

use crate::domain::error::StringError;
use crate::ports::string_service::{RequestContext, StringService};

/// Target of every per-call record, for filtering (`RUST_LOG=stringsvc::calls=info`).
pub const CALL_TARGET: &str = "stringsvc::calls";

/// Decorator logging method, input, output, error and duration.
///
/// The log sink is the process-wide default subscriber unless a
/// [`Dispatch`] is injected with [`LoggingMiddleware::with_sink`].
pub struct LoggingMiddleware<S> {
    next: S,
    sink: Option<Dispatch>,
}

impl<S: StringService> LoggingMiddleware<S> {
    /// Wrap `next`, logging to the default subscriber.
    pub const fn new(next: S) -> Self {
        Self { next, sink: None }
    }

    /// Wrap `next`, logging to `sink`.
    pub const fn with_sink(next: S, sink: Dispatch) -> Self {
        Self {
            next,
            sink: Some(sink),
        }
    }

    fn emit(&self, record: impl FnOnce()) {
        match &self.sink {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, record),
            None => record(),
        }
    }
}

impl<S: StringService> StringService for LoggingMiddleware<S> {
    fn uppercase(&self, ctx: &RequestContext, text: &str) -> Result<String, StringError> {
        let start = Instant::now();
        let result = self.next.uppercase(ctx, text);
        let took = start.elapsed();

        self.emit(|| {
            let (output, err) = match &result {
                Ok(v) => (v.as_str(), String::new()),
                Err(e) => ("", e.to_string()),
            };
            info!(
                target: CALL_TARGET,
                request_id = %ctx.request_id,
                method = "uppercase",
                input = text,
                output,
                err = %err,
                took = ?took,
                "call"
            );
        });

        result
    }

    fn count(&self, ctx: &RequestContext, text: &str) -> usize {
        let start = Instant::now();
        let n = self.next.count(ctx, text);
        let took = start.elapsed();

        self.emit(|| {
            info!(
                target: CALL_TARGET,
                request_id = %ctx.request_id,
                method = "count",
                input = text,
                n,
                took = ?took,
                "call"
            );
        });

        n
    }
}

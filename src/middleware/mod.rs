//! Middleware Layer - Decorators over `StringService`
//!
//! Each decorator wraps any `S: StringService`, does its cross-cutting
//! work around the delegated call and returns the inner result untouched.
//! Decorators know nothing about each other, so they stack in any order:
//!
//! ```ignore
//! let svc = LoggingMiddleware::new(InstrumentingMiddleware::new(Strings, collectors));
//! ```
//!
//! [`compose`] builds the same kind of chain from a configured layer list.

pub mod instrumenting;
pub mod logging;

use serde::Deserialize;
use thiserror::Error;
use tracing::Dispatch;

use crate::ports::string_service::StringService;

pub use instrumenting::{Collectors, InstrumentingMiddleware};
pub use logging::LoggingMiddleware;

/// A decorator that can be named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// [`LoggingMiddleware`].
    Logging,
    /// [`InstrumentingMiddleware`].
    Instrumenting,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging => write!(f, "logging"),
            Self::Instrumenting => write!(f, "instrumenting"),
        }
    }
}

/// Resources the layers draw on when composed.
#[derive(Debug, Clone, Default)]
pub struct LayerDeps {
    /// Required by [`Layer::Instrumenting`].
    pub collectors: Option<Collectors>,
    /// Optional sink for [`Layer::Logging`]; default subscriber otherwise.
    pub log_sink: Option<Dispatch>,
}

/// Errors building a chain from configuration.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// An instrumenting layer was requested without collectors.
    #[error("layer `instrumenting` requires metric collectors")]
    MissingCollectors,
}

/// Wrap `core` in `layers`, listed outermost first.
///
/// An empty list returns the core unchanged (boxed).
///
/// # Errors
/// Returns [`ComposeError::MissingCollectors`] if `layers` contains
/// [`Layer::Instrumenting`] and `deps.collectors` is `None`.
pub fn compose<S>(
    core: S,
    layers: &[Layer],
    deps: &LayerDeps,
) -> Result<Box<dyn StringService>, ComposeError>
where
    S: StringService + 'static,
{
    let mut svc: Box<dyn StringService> = Box::new(core);

    for layer in layers.iter().rev() {
        svc = match layer {
            Layer::Logging => match &deps.log_sink {
                Some(sink) => Box::new(LoggingMiddleware::with_sink(svc, sink.clone())),
                None => Box::new(LoggingMiddleware::new(svc)),
            },
            Layer::Instrumenting => {
                let collectors = deps
                    .collectors
                    .clone()
                    .ok_or(ComposeError::MissingCollectors)?;
                Box::new(InstrumentingMiddleware::new(svc, collectors))
            }
        };
    }

    Ok(svc)
}

//! Core string service.
//!
//! Unicode-aware: both operations work on code points, never bytes.

use crate::domain::error::StringError;
use crate::ports::string_service::{RequestContext, StringService};

/// The undecorated string service.
///
/// Zero-sized and stateless, so it is trivially `Send + Sync` and any
/// number of callers may share one instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strings;

impl Strings {
    /// Create the core service.
    pub const fn new() -> Self {
        Self
    }
}

impl StringService for Strings {
    fn uppercase(&self, _ctx: &RequestContext, text: &str) -> Result<String, StringError> {
        if text.is_empty() {
            return Err(StringError::EmptyInput);
        }
        Ok(text.to_uppercase())
    }

    fn count(&self, _ctx: &RequestContext, text: &str) -> usize {
        text.chars().count()
    }
}

//! String Service Port - The Decorated Capability
//!
//! Every layer of the chain, from the core `Strings` up to the outermost
//! middleware, implements this trait. Decorators only ever see
//! `S: StringService`, never the concrete type they wrap.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::error::StringError;

/// Per-call context handed through every layer.
///
/// Carries nothing the operations depend on; it exists so that
/// observability layers can correlate records belonging to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
  /// Request identifier, generated at the transport boundary.
  pub request_id: Uuid,
}

impl RequestContext {
  /// Create a context with a fresh random request id.
  pub fn new() -> Self {
    Self {
      request_id: Uuid::new_v4(),
    }
  }

  /// Create a context for a known request id.
  pub const fn with_id(request_id: Uuid) -> Self {
    Self { request_id }
  }
}

impl Default for RequestContext {
  fn default() -> Self {
    Self::new()
  }
}

/// The string service capability.
///
/// Both operations are synchronous: nothing in the chain blocks or awaits.
/// Implementations must be safe to call from many request tasks at once.
pub trait StringService: Send + Sync {
  /// Uppercase `text` on code points.
  ///
  /// # Errors
  /// Returns [`StringError::EmptyInput`] if `text` is empty.
  fn uppercase(&self, ctx: &RequestContext, text: &str) -> Result<String, StringError>;

  /// Number of code points in `text`. Never fails; `""` counts as 0.
  fn count(&self, ctx: &RequestContext, text: &str) -> usize;
}

impl<S: StringService + ?Sized> StringService for Box<S> {
  fn uppercase(&self, ctx: &RequestContext, text: &str) -> Result<String, StringError> {
    (**self).uppercase(ctx, text)
  }

  fn count(&self, ctx: &RequestContext, text: &str) -> usize {
    (**self).count(ctx, text)
  }
}

impl<S: StringService + ?Sized> StringService for Arc<S> {
  fn uppercase(&self, ctx: &RequestContext, text: &str) -> Result<String, StringError> {
    (**self).uppercase(ctx, text)
  }

  fn count(&self, ctx: &RequestContext, text: &str) -> usize {
    (**self).count(ctx, text)
  }
}

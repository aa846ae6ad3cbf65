//! Domain error taxonomy.

use thiserror::Error;

/// Errors raised by the string operations.
///
/// There is exactly one: `uppercase` refuses empty input. `count` is
/// total and has no error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StringError {
    /// `uppercase` was called with the empty string.
    #[error("empty string")]
    EmptyInput,
}

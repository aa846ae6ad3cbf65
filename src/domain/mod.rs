//! Domain layer - the string operations themselves.
//!
//! Pure, stateless logic with no transport or observability concerns
//! (hexagonal architecture inner ring).

pub mod error;
pub mod strings;

pub use error::StringError;
pub use strings::Strings;

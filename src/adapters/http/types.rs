//! API Request/Response Types
//!
//! JSON bodies for the two routes. Errors don't serialize, so the
//! uppercase response carries the error message as a string.

use serde::{Deserialize, Serialize};

/// Body of `POST /uppercase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseRequest {
  /// Text to uppercase.
  pub s: String,
}

/// Response of `POST /uppercase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseResponse {
  /// Uppercased text; empty when `err` is set.
  pub v: String,
  /// Error message; omitted on success.
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub err: String,
}

/// Body of `POST /count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRequest {
  /// Text to count.
  pub s: String,
}

/// Response of `POST /count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
  /// Number of code points.
  pub v: usize,
}

/// Body of every transport-level failure (4xx/5xx).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
  /// Human-readable reason.
  pub error: String,
}

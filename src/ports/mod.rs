//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) shared by the core service, the
//! middleware stack and the adapters.
//!
//! Port categories:
//! - `StringService`: the capability every layer of the chain implements
//! - `Counter` / `Histogram`: metric collectors injected into instrumentation

pub mod metrics;
pub mod string_service;

pub use metrics::{Counter, Histogram, Labels};
pub use string_service::{RequestContext, StringService};

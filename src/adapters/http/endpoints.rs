//! Endpoint Adapters - Value Objects In, Value Objects Out
//!
//! No HTTP types here: the server decodes bodies into requests and
//! encodes the returned responses. The domain error becomes the `err`
//! field and never an HTTP failure.

use std::sync::Arc;

use super::types::{CountRequest, CountResponse, UppercaseRequest, UppercaseResponse};
use crate::ports::string_service::{RequestContext, StringService};

/// The service chain as seen by the transport.
#[derive(Clone)]
pub struct Endpoints {
    svc: Arc<dyn StringService>,
}

impl Endpoints {
    /// Wrap the outermost layer of a service chain.
    pub fn new(svc: Arc<dyn StringService>) -> Self {
        Self { svc }
    }

    /// `uppercase` endpoint.
    pub fn uppercase(&self, ctx: &RequestContext, req: UppercaseRequest) -> UppercaseResponse {
        match self.svc.uppercase(ctx, &req.s) {
            Ok(v) => UppercaseResponse {
                v,
                err: String::new(),
            },
            Err(e) => UppercaseResponse {
                v: String::new(),
                err: e.to_string(),
            },
        }
    }

    /// `count` endpoint.
    pub fn count(&self, ctx: &RequestContext, req: CountRequest) -> CountResponse {
        CountResponse {
            v: self.svc.count(ctx, &req.s),
        }
    }
}

//! Request middleware applied by [`ReqwestTransport`](super::ReqwestTransport).

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::TransportRequest;

/// Rewrites a request before it is sent.
///
/// Each middleware is paired with an options object in a
/// [`MiddlewareEntry`]; the same middleware can appear several times with
/// different options.
pub trait Middleware: Send + Sync + fmt::Debug {
    /// Stable name; part of the key transports are pooled under.
    fn name(&self) -> &str;

    fn prepare(&self, request: &mut TransportRequest, options: &Value);
}

/// A middleware and the options it runs with.
#[derive(Debug, Clone)]
pub struct MiddlewareEntry {
    middleware: Arc<dyn Middleware>,
    options: Value,
}

impl MiddlewareEntry {
    pub fn new(middleware: impl Middleware + 'static, options: Value) -> Self {
        Self {
            middleware: Arc::new(middleware),
            options,
        }
    }

    pub fn name(&self) -> &str {
        self.middleware.name()
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    pub fn apply(&self, request: &mut TransportRequest) {
        self.middleware.prepare(request, &self.options);
    }
}

/// Ordered middleware, applied first to last.
pub type MiddlewareStack = Vec<MiddlewareEntry>;

/// Adds the headers of its options object unless the request already has
/// them.
///
/// ```
/// use serde_json::json;
/// use strut::RestMethod;
/// use strut::transport::{MiddlewareEntry, StaticHeaders, TransportRequest};
///
/// let entry = MiddlewareEntry::new(StaticHeaders, json!({ "Accept": "application/json" }));
/// let mut request = TransportRequest::new(RestMethod::Get, "http://localhost/pets");
/// entry.apply(&mut request);
/// assert_eq!(request.headers["Accept"], "application/json");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHeaders;

impl Middleware for StaticHeaders {
    fn name(&self) -> &str {
        "static_headers"
    }

    fn prepare(&self, request: &mut TransportRequest, options: &Value) {
        let Some(headers) = options.as_object() else {
            return;
        };
        for (name, value) in headers {
            if request.has_header(name) {
                continue;
            }
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            request.headers.insert(name.clone(), value);
        }
    }
}

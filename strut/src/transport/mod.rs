//! The HTTP transport capability.
//!
//! Generated calls never talk to `reqwest` directly: they hand a
//! [`TransportRequest`] to a [`Transport`]. [`ReqwestTransport`] is the
//! production implementation; tests and hosts can plug in their own.
//!
//! Reqwest transports are pooled per middleware stack through [`shared`], so
//! every client built with the same stack reuses one connection pool.

mod middleware;
mod reqwest_transport;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use lazy_static::lazy_static;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ClientError;
use crate::method::RestMethod;
use crate::response::Response;

pub use middleware::{Middleware, MiddlewareEntry, MiddlewareStack, StaticHeaders};
pub use reqwest_transport::ReqwestTransport;

/// A boxed, `Send` future; keeps [`Transport`] dyn-compatible.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything a transport needs to perform one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: RestMethod,
    pub url: String,
    /// Query string for body-less verbs, JSON body otherwise.
    pub params: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    pub fn new(method: RestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Map::new(),
            headers: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Returns `true` if a header named `name` is set, ignoring case.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|key| key.eq_ignore_ascii_case(name))
    }
}

/// Sends requests and returns parsed responses.
///
/// Implementations report non-success statuses as
/// [`ClientError::HttpStatus`].
pub trait Transport: Send + Sync + fmt::Debug {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<Response, ClientError>>;
}

type PoolKey = Vec<(String, String)>;

lazy_static! {
    /// One reqwest transport per distinct middleware stack.
    static ref POOL: Mutex<HashMap<PoolKey, Arc<ReqwestTransport>>> = Mutex::new(HashMap::new());
}

fn pool_key(stack: &[MiddlewareEntry]) -> PoolKey {
    stack
        .iter()
        .map(|entry| (entry.name().to_string(), entry.options().to_string()))
        .collect()
}

/// Returns the pooled transport for `stack`, creating it on first use.
///
/// Stacks are equal when their middleware names and options match in order.
///
/// ## Errors
///
/// Returns [`ClientError::Request`] if the HTTP client cannot be constructed.
pub fn shared(stack: &[MiddlewareEntry]) -> Result<Arc<ReqwestTransport>, ClientError> {
    let key = pool_key(stack);
    let mut pool = POOL.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(transport) = pool.get(&key) {
        return Ok(Arc::clone(transport));
    }

    debug!(middleware = stack.len(), "creating pooled transport");
    let transport = Arc::new(ReqwestTransport::new(stack.to_vec())?);
    pool.insert(key, Arc::clone(&transport));
    Ok(transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_stack_shares_a_transport() {
        let stack = vec![MiddlewareEntry::new(
            StaticHeaders,
            json!({ "X-Pool-Test": "same" }),
        )];
        let first = shared(&stack).unwrap();
        let second = shared(&stack.clone()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_different_options_get_different_transports() {
        let first = shared(&[MiddlewareEntry::new(StaticHeaders, json!({ "X-Pool": "a" }))]).unwrap();
        let second = shared(&[MiddlewareEntry::new(StaticHeaders, json!({ "X-Pool": "b" }))]).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_has_header_ignores_case() {
        let mut request = TransportRequest::new(RestMethod::Get, "http://localhost/");
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        assert!(request.has_header("content-type"));
        assert!(!request.has_header("accept"));
    }
}

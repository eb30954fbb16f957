//! Client configuration.
//!
//! [`CreateOptions`] is what callers hand to [`create`](crate::create); the
//! `SpecBuilder` resolves it against the document into an immutable
//! [`Configuration`] shared by every generated call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;

use crate::auth::{Auth, build_headers};
use crate::error::{ArgumentError, HttpError, StrutError};
use crate::transport::{self, Middleware, MiddlewareEntry, MiddlewareStack, Transport};

/// Protocol used when neither the options nor the caller choose one.
pub const DEFAULT_PROTOCOL: &str = "http";

/// Options accepted by [`create`](crate::create).
///
/// Every field is optional. `host` and `base_path` override the document's
/// values. Besides the builder methods, options can be deserialized from a
/// host application's config file:
///
/// ```
/// use strut::CreateOptions;
///
/// let options: CreateOptions = serde_json::from_str(r#"{
///     "host": "localhost:8080",
///     "protocol": "https",
///     "headers": { "X-Client": "billing" },
///     "auth": { "token": "secret" },
///     "timeout": 5000
/// }"#).unwrap();
///
/// assert_eq!(options.host.as_deref(), Some("localhost:8080"));
/// assert_eq!(options.timeout.map(|t| t.as_millis()), Some(5000));
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOptions {
    pub host: Option<String>,
    #[serde(alias = "base_path")]
    pub base_path: Option<String>,
    pub protocol: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub auth: Option<Auth>,
    /// Default per-call timeout, in milliseconds when deserialized.
    #[serde(deserialize_with = "deserialize_timeout_ms")]
    pub timeout: Option<Duration>,
    #[serde(skip)]
    pub middleware: MiddlewareStack,
    /// Replaces the pooled reqwest transport.
    #[serde(skip)]
    pub transport: Option<Arc<dyn Transport>>,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Appends a middleware to the transport stack.
    pub fn middleware(
        mut self,
        middleware: impl Middleware + 'static,
        options: serde_json::Value,
    ) -> Self {
        self.middleware.push(MiddlewareEntry::new(middleware, options));
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Configured headers plus the `Authorization` header derived from `auth`.
    pub fn resolved_headers(&self) -> BTreeMap<String, String> {
        build_headers(&self.headers, self.auth.as_ref())
    }
}

impl fmt::Debug for CreateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateOptions")
            .field("host", &self.host)
            .field("base_path", &self.base_path)
            .field("protocol", &self.protocol)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("middleware", &self.middleware)
            .field("transport", &self.transport)
            .finish()
    }
}

fn deserialize_timeout_ms<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

/// Per-call options accepted by generated operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CallOptions {
    pub headers: BTreeMap<String, String>,
    pub auth: Option<Auth>,
    #[serde(deserialize_with = "deserialize_timeout_ms")]
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Call headers plus the `Authorization` header derived from `auth`.
    pub fn resolved_headers(&self) -> BTreeMap<String, String> {
        build_headers(&self.headers, self.auth.as_ref())
    }
}

/// Resolved settings shared by every operation of one generated client.
#[derive(Debug, Clone)]
pub struct Configuration {
    host: String,
    base_path: String,
    protocol: String,
    headers: BTreeMap<String, String>,
    middleware: MiddlewareStack,
    timeout: Option<Duration>,
    transport: Arc<dyn Transport>,
}

impl Configuration {
    /// Resolves `options` against the document's host and base path.
    ///
    /// `headers` are the already-resolved headers (auth included). Without a
    /// transport override the pooled transport for the middleware stack is
    /// used.
    ///
    /// ## Errors
    ///
    /// - [`ArgumentError::InvalidHeader`] for headers that cannot be sent
    /// - [`HttpError`] if the pooled transport cannot be created
    pub fn resolve(
        options: &CreateOptions,
        spec_host: &str,
        spec_base_path: &str,
        headers: BTreeMap<String, String>,
    ) -> Result<Self, StrutError> {
        validate_headers(&headers)?;

        let transport: Arc<dyn Transport> = match &options.transport {
            Some(transport) => Arc::clone(transport),
            None => transport::shared(&options.middleware).map_err(HttpError::from)?,
        };

        Ok(Self {
            host: options.host.clone().unwrap_or_else(|| spec_host.to_string()),
            base_path: options
                .base_path
                .clone()
                .unwrap_or_else(|| spec_base_path.to_string()),
            protocol: options
                .protocol
                .clone()
                .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
            headers,
            middleware: options.middleware.clone(),
            timeout: options.timeout,
            transport,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn middleware(&self) -> &MiddlewareStack {
        &self.middleware
    }

    /// Default timeout applied when a call does not set one.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// `{protocol}://{host}{base_path}`, with a base path of `/` dropped.
    pub fn base_url(&self) -> String {
        let base_path = if self.base_path == "/" {
            ""
        } else {
            self.base_path.as_str()
        };
        format!("{}://{}{}", self.protocol, self.host, base_path)
    }
}

/// Rejects header names or values that cannot go on the wire.
pub(crate) fn validate_headers(headers: &BTreeMap<String, String>) -> Result<(), ArgumentError> {
    for (name, value) in headers {
        HeaderName::try_from(name.as_str()).map_err(|e| ArgumentError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        HeaderValue::try_from(value.as_str()).map_err(|e| ArgumentError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AUTHORIZATION;
    use crate::transport::StaticHeaders;
    use serde_json::json;

    fn configuration(options: &CreateOptions) -> Configuration {
        Configuration::resolve(options, "petstore.swagger.io", "/v2", options.resolved_headers())
            .unwrap()
    }

    #[test]
    fn test_defaults_come_from_the_document() {
        let config = configuration(&CreateOptions::new());
        assert_eq!(config.host(), "petstore.swagger.io");
        assert_eq!(config.base_path(), "/v2");
        assert_eq!(config.protocol(), "http");
        assert_eq!(config.base_url(), "http://petstore.swagger.io/v2");
    }

    #[test]
    fn test_options_override_the_document() {
        let config = configuration(
            &CreateOptions::new()
                .host("localhost:3000")
                .base_path("/")
                .protocol("https"),
        );
        assert_eq!(config.base_url(), "https://localhost:3000");
    }

    #[test]
    fn test_headers_include_auth() {
        let config = configuration(
            &CreateOptions::new()
                .header("X-Client", "test")
                .auth(Auth::token("abc")),
        );
        assert_eq!(config.headers()["X-Client"], "test");
        assert_eq!(config.headers()[AUTHORIZATION], "abc");
    }

    #[test]
    fn test_rejects_unsendable_headers() {
        let options = CreateOptions::new().header("Bad Header", "x");
        let result = Configuration::resolve(&options, "h", "/", options.resolved_headers());
        assert!(matches!(
            result,
            Err(StrutError::Argument(ArgumentError::InvalidHeader { name, .. })) if name == "Bad Header"
        ));
    }

    #[test]
    fn test_same_middleware_reuses_the_pooled_transport() {
        let options = CreateOptions::new().middleware(StaticHeaders, json!({ "X-Config-Test": 1 }));
        let first = configuration(&options);
        let second = configuration(&options.clone());
        assert!(Arc::ptr_eq(first.transport(), second.transport()));
        assert_eq!(first.middleware().len(), 1);
    }

    #[test]
    fn test_deserializes_from_config_documents() {
        let options: CreateOptions = serde_json::from_value(json!({
            "basePath": "/api",
            "auth": { "basic": { "username": "u", "password": "p" } }
        }))
        .unwrap();
        assert_eq!(options.base_path.as_deref(), Some("/api"));
        assert_eq!(options.resolved_headers()[AUTHORIZATION], "Basic dTpw");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let options = CreateOptions::new().auth(Auth::token("super-secret"));
        assert!(!format!("{options:?}").contains("super-secret"));
    }

    #[test]
    fn test_call_options_resolve_auth() {
        let options: CallOptions = serde_json::from_value(json!({
            "headers": { "a": "2" },
            "timeout": 250
        }))
        .unwrap();
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
        assert_eq!(options.resolved_headers()["a"], "2");
    }
}

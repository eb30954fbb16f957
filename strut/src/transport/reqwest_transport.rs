//! [`Transport`] backed by `reqwest`.

use std::collections::BTreeMap;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tracing::{Span, instrument};

use super::{BoxFuture, MiddlewareStack, Transport, TransportRequest};
use crate::error::ClientError;
use crate::response::Response;

/// Sends requests with a pooled `reqwest::Client`.
///
/// Parameters become the query string for body-less verbs and a JSON body
/// for `POST`, `PUT` and `PATCH`. Every middleware of the stack runs, in
/// order, before the request is built.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    middleware: MiddlewareStack,
}

impl ReqwestTransport {
    /// ## Errors
    ///
    /// Returns [`ClientError::Request`] if the HTTP client cannot be constructed.
    pub fn new(middleware: MiddlewareStack) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { client, middleware })
    }

    pub fn middleware(&self) -> &MiddlewareStack {
        &self.middleware
    }

    #[instrument(
        name = "api_request",
        skip(self, request),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn execute(&self, mut request: TransportRequest) -> Result<Response, ClientError> {
        for entry in &self.middleware {
            entry.apply(&mut request);
        }

        Span::current().record("http.method", request.method.to_string().as_str());
        Span::current().record("http.url", request.url.as_str());

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &request.url)
            .headers(header_map(&request.headers)?);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = if request.method.has_body() {
            builder.json(&request.params)
        } else {
            builder.query(&query_pairs(&request.params))
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::classify(e, request.timeout))?;

        let status = response.status();
        let status_code = status.as_u16();
        Span::current().record("http.status_code", status_code);

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());

            let otel_status = if status.is_server_error() {
                "ERROR"
            } else {
                "UNSET"
            };
            Span::current().record("otel.status_code", otel_status);

            return Err(ClientError::HttpStatus {
                status: status_code,
                message,
            });
        }

        Span::current().record("otel.status_code", "OK");

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let is_json = headers
            .get(CONTENT_TYPE.as_str())
            .is_some_and(|content_type| is_json_content_type(content_type));

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::classify(e, request.timeout))?;

        let body = if text.is_empty() {
            Value::Null
        } else if is_json {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };

        Ok(Response::new(status_code, headers, body))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<Response, ClientError>> {
        Box::pin(self.execute(request))
    }
}

/// Matches `application/json`, `application/problem+json; charset=utf-8`, ...
fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().ends_with("json"))
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::try_from(name.as_str())
            .map_err(|e| ClientError::Connection(format!("invalid header name `{name}`: {e}")))?;
        let header_value = HeaderValue::try_from(value.as_str())
            .map_err(|e| ClientError::Connection(format!("invalid header value for `{name}`: {e}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Flattens parameters into query pairs; arrays repeat their key.
fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.clone(), query_value(item))));
            }
            other => pairs.push((key.clone(), query_value(other))),
        }
    }
    pairs
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RestMethod;
    use crate::transport::{MiddlewareEntry, StaticHeaders};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(verb: RestMethod, url: String, params: Value) -> TransportRequest {
        let mut request = TransportRequest::new(verb, url);
        if let Value::Object(params) = params {
            request.params = params;
        }
        request
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/vnd.api+json; charset=utf-8"));
        assert!(!is_json_content_type("text/html"));
    }

    #[test]
    fn test_query_pairs_repeat_arrays_and_skip_nulls() {
        let params = json!({ "tags": ["a", "b"], "limit": 10, "status": null });
        let Value::Object(params) = params else {
            unreachable!()
        };
        assert_eq!(
            query_pairs(&params),
            [
                ("tags".to_string(), "a".to_string()),
                ("tags".to_string(), "b".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_sends_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/pet/findByStatus"))
            .and(query_param("status", "available"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Vec::new()).unwrap();
        let response = transport
            .send(request(
                RestMethod::Get,
                format!("{}/v2/pet/findByStatus", server.uri()),
                json!({ "status": "available" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), &json!([{ "id": 1 }]));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/pet"))
            .and(body_json(json!({ "name": "Rex" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Vec::new()).unwrap();
        let response = transport
            .send(request(
                RestMethod::Post,
                format!("{}/v2/pet", server.uri()),
                json!({ "name": "Rex" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.body()["id"], 7);
    }

    #[tokio::test]
    async fn test_non_json_body_is_kept_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/user/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Vec::new()).unwrap();
        let response = transport
            .send(request(
                RestMethod::Get,
                format!("{}/v2/user/logout", server.uri()),
                Value::Null,
            ))
            .await
            .unwrap();

        assert_eq!(response.body(), &json!("ok"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Pet not found"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Vec::new()).unwrap();
        let err = transport
            .send(request(
                RestMethod::Get,
                format!("{}/v2/pet/99", server.uri()),
                Value::Null,
            ))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(
            err,
            ClientError::HttpStatus { message, .. } if message == "Pet not found"
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Vec::new()).unwrap();
        let mut slow = request(RestMethod::Get, format!("{}/slow", server.uri()), Value::Null);
        slow.timeout = Some(Duration::from_millis(50));

        let err = transport.send(slow).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { duration_ms: 50 }));
    }

    #[tokio::test]
    async fn test_middleware_runs_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-client", "strut"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(vec![MiddlewareEntry::new(
            StaticHeaders,
            json!({ "X-Client": "strut" }),
        )])
        .unwrap();
        let response = transport
            .send(request(RestMethod::Get, format!("{}/ping", server.uri()), Value::Null))
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
        assert_eq!(response.body(), &Value::Null);
    }
}

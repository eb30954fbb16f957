//! The top-level entry point.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::builder::SpecBuilder;
use crate::config::CreateOptions;
use crate::error::{ArgumentError, HttpError, StrutError};
use crate::method::RestMethod;
use crate::namespace::Namespace;
use crate::transport::{self, Transport, TransportRequest};

/// Where a Swagger document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecSource {
    /// Downloaded with the configured headers. JSON bodies are preferred;
    /// anything else is parsed as YAML.
    Url(String),
    /// JSON text.
    Json(String),
    /// YAML text.
    Yaml(String),
    /// An already parsed document.
    Value(Value),
}

impl SpecSource {
    /// Picks `url` over `json`, like [`create`].
    ///
    /// ## Errors
    ///
    /// Returns [`ArgumentError::MissingSource`] when both are `None`.
    pub fn from_parts(url: Option<&str>, json: Option<&str>) -> Result<Self, ArgumentError> {
        match (url, json) {
            (Some(url), _) => Ok(Self::Url(url.to_string())),
            (None, Some(json)) => Ok(Self::Json(json.to_string())),
            (None, None) => Err(ArgumentError::MissingSource),
        }
    }
}

/// Generates a client from a Swagger 2.0 document and registers it as
/// `module_name`.
///
/// `url` wins when both `url` and `json` are given.
///
/// ## Examples
///
/// ```rust,ignore
/// use serde_json::json;
/// use strut::{CallOptions, CreateOptions, create};
///
/// let petstore = create(
///     Some("http://petstore.swagger.io/v2/swagger.json"),
///     None,
///     "Petstore",
///     CreateOptions::new(),
/// )
/// .await?;
///
/// let pet = petstore
///     .lookup("Pet")
///     .unwrap()
///     .call("get_pet_by_id", json!({ "petId": 1 }), CallOptions::new())
///     .await?;
/// ```
///
/// ## Errors
///
/// - [`ArgumentError`] when no source is given or the source is malformed
/// - [`HttpError`] when the document cannot be downloaded
/// - [`VersionError`](crate::error::VersionError) and
///   [`SchemaError`](crate::error::SchemaError) when the document is invalid
pub async fn create(
    url: Option<&str>,
    json: Option<&str>,
    module_name: &str,
    options: CreateOptions,
) -> Result<Arc<Namespace>, StrutError> {
    let source = SpecSource::from_parts(url, json)?;
    create_from(source, module_name, options).await
}

/// [`create`] for any [`SpecSource`].
#[instrument(skip(source, options))]
pub async fn create_from(
    source: SpecSource,
    module_name: &str,
    options: CreateOptions,
) -> Result<Arc<Namespace>, StrutError> {
    let headers = options.resolved_headers();

    let document = match source {
        SpecSource::Url(url) => fetch(&url, &options).await?,
        SpecSource::Json(text) => parse_json(&text)?,
        SpecSource::Yaml(text) => parse_yaml(&text)?,
        SpecSource::Value(document) => document,
    };

    SpecBuilder::new(document, module_name, &options, Some(headers))?.make_resource()
}

/// Downloads and parses a document.
async fn fetch(url: &str, options: &CreateOptions) -> Result<Value, StrutError> {
    Url::parse(url).map_err(ArgumentError::from)?;

    let transport: Arc<dyn Transport> = match &options.transport {
        Some(transport) => Arc::clone(transport),
        None => transport::shared(&options.middleware).map_err(|e| HttpError::fetch(url, e))?,
    };

    let mut request = TransportRequest::new(RestMethod::Get, url);
    request.headers = options.resolved_headers();
    request.timeout = options.timeout;

    debug!(url, "fetching document");
    let response = transport
        .send(request)
        .await
        .map_err(|e| HttpError::fetch(url, e))?;

    match response.into_body() {
        Value::String(text) => parse_json(&text).or_else(|_| parse_yaml(&text)),
        document => Ok(document),
    }
}

fn parse_json(text: &str) -> Result<Value, StrutError> {
    Ok(serde_json::from_str::<Value>(text).map_err(ArgumentError::from)?)
}

fn parse_yaml(text: &str) -> Result<Value, StrutError> {
    Ok(serde_yaml::from_str::<Value>(text).map_err(ArgumentError::from)?)
}

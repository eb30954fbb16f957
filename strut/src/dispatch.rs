//! Turns a generated call into an HTTP request.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{CallOptions, Configuration, validate_headers};
use crate::error::{HttpError, ParameterError, StrutError};
use crate::operation::Operation;
use crate::path::Path;
use crate::response::Response;
use crate::transport::TransportRequest;

/// Builds the request for `operation` without sending it.
///
/// Path parameters are substituted into the template and removed from
/// `args`. Arguments naming a declared header parameter (compared
/// case-insensitively) move to the headers. Headers merge by name, ignoring
/// ASCII case, with later layers winning: configuration, call options,
/// declared header arguments, then `explicit_headers`.
///
/// ## Errors
///
/// - [`ParameterError::MissingPathParameter`] for the first template
///   parameter without a matching argument
/// - [`ArgumentError::InvalidHeader`](crate::error::ArgumentError::InvalidHeader)
///   when a merged header cannot go on the wire
pub fn prepare(
    operation: &Operation,
    path: &Path,
    configuration: &Configuration,
    mut args: Map<String, Value>,
    options: &CallOptions,
    explicit_headers: &BTreeMap<String, String>,
) -> Result<TransportRequest, StrutError> {
    let mut url_path = path.template().to_string();
    for name in path.parameter_elements() {
        let value = args.get(name).ok_or_else(|| ParameterError::missing(name))?;
        url_path = url_path.replacen(&format!("{{{name}}}"), &plain_string(value), 1);
    }
    for name in path.parameter_elements() {
        args.remove(name);
    }

    let header_names = operation.header_parameter_names();
    let declared_headers: Vec<String> = args
        .keys()
        .filter(|key| header_names.contains(&key.to_lowercase()))
        .cloned()
        .collect();

    let mut headers = BTreeMap::new();
    for (name, value) in configuration.headers().clone() {
        merge_header(&mut headers, name, value);
    }
    for (name, value) in options.resolved_headers() {
        merge_header(&mut headers, name, value);
    }
    for name in declared_headers {
        if let Some(value) = args.remove(&name) {
            let value = plain_string(&value);
            merge_header(&mut headers, name, value);
        }
    }
    for (name, value) in explicit_headers {
        merge_header(&mut headers, name.clone(), value.clone());
    }
    validate_headers(&headers)?;

    Ok(TransportRequest {
        method: operation.verb(),
        url: format!("{}{}", configuration.base_url(), url_path),
        params: args,
        headers,
        timeout: options.timeout.or(configuration.timeout()),
    })
}

/// Prepares and sends one request through the configured transport.
///
/// ## Errors
///
/// - [`StrutError::Parameter`] when a path parameter is missing
/// - [`StrutError::Http`] wrapping any transport failure
pub async fn dispatch(
    operation: &Operation,
    path: &Path,
    configuration: &Configuration,
    args: Map<String, Value>,
    options: &CallOptions,
    explicit_headers: &BTreeMap<String, String>,
) -> Result<Response, StrutError> {
    let request = prepare(operation, path, configuration, args, options, explicit_headers)?;
    debug!(
        operation = operation.id(),
        method = %request.method,
        url = %request.url,
        "dispatching operation"
    );

    configuration
        .transport()
        .send(request)
        .await
        .map_err(|e| HttpError::from(e).into())
}

/// Replaces every entry whose name equals `name` ignoring ASCII case.
fn merge_header(headers: &mut BTreeMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Strings are used raw; anything else as its JSON text.
fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

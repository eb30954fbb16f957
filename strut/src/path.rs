//! Swagger path templates.
//!
//! A [`Path`] splits a template such as `/store/order/{orderId}` into its
//! static segments (`store`, `order`) and its parameter names (`orderId`),
//! and lazily turns the raw verb map into [`Operation`]s.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::SchemaError;
use crate::operation::{DeclaredParameter, Operation};

/// Key of a path item that holds parameters shared by all its operations.
const SHARED_PARAMETERS_KEY: &str = "parameters";

/// Key of a path item that points at an external definition; not followed.
const REFERENCE_KEY: &str = "$ref";

/// One entry of a spec's `paths` object.
#[derive(Debug)]
pub struct Path {
    template: String,
    non_parameter_elements: Vec<String>,
    parameter_elements: Vec<String>,
    raw_operations: Value,
    operations: OnceLock<Vec<Arc<Operation>>>,
}

impl Path {
    /// Creates a path from its template and raw verb -> operation map.
    ///
    /// The map is not inspected until [`operations`](Self::operations) is
    /// called.
    pub fn new(template: impl Into<String>, raw_operations: Value) -> Self {
        let template = template.into();
        let mut non_parameter_elements = Vec::new();
        let mut parameter_elements = Vec::new();

        for segment in template.split('/').filter(|s| !s.is_empty()) {
            let params = extract_path_params(segment);
            if params.is_empty() {
                non_parameter_elements.push(segment.to_string());
            } else {
                parameter_elements.extend(params.into_iter().map(str::to_string));
            }
        }

        Self {
            template,
            non_parameter_elements,
            parameter_elements,
            raw_operations,
            operations: OnceLock::new(),
        }
    }

    /// Returns the raw template, e.g. `/pet/{petId}`.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Static segments in template order.
    pub fn non_parameter_elements(&self) -> &[String] {
        &self.non_parameter_elements
    }

    /// Parameter names in template order.
    pub fn parameter_elements(&self) -> &[String] {
        &self.parameter_elements
    }

    /// Returns one [`Operation`] per verb, building them on first access.
    ///
    /// A path-level `parameters` list is merged into every operation.
    /// `$ref` and `x-` extension keys are ignored.
    ///
    /// ## Errors
    ///
    /// - [`SchemaError::OperationsNotMapping`] if the raw value is not an object
    /// - [`SchemaError::UnsupportedVerb`] for keys that are not HTTP verbs
    /// - [`SchemaError::MissingOperationId`] for operations without an id
    pub fn operations(&self) -> Result<&[Arc<Operation>], SchemaError> {
        if let Some(operations) = self.operations.get() {
            return Ok(operations);
        }

        let Value::Object(raw) = &self.raw_operations else {
            return Err(SchemaError::OperationsNotMapping {
                path: self.template.clone(),
            });
        };

        let shared = raw
            .get(SHARED_PARAMETERS_KEY)
            .map(DeclaredParameter::parse_list)
            .unwrap_or_default();

        let mut operations = Vec::with_capacity(raw.len());
        for (verb, definition) in raw {
            if verb == SHARED_PARAMETERS_KEY
                || verb == REFERENCE_KEY
                || verb.starts_with("x-")
            {
                continue;
            }
            let operation = Operation::new(verb, definition, &self.template, &shared)?;
            operations.push(Arc::new(operation));
        }

        Ok(self.operations.get_or_init(|| operations))
    }
}

/// Extracts parameter names from a path template or segment.
///
/// ## Examples
///
/// ```
/// use strut::path::extract_path_params;
///
/// assert_eq!(extract_path_params("/pets"), Vec::<&str>::new());
/// assert_eq!(
///     extract_path_params("/store/order/{orderId}"),
///     vec!["orderId"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = None;

    for (idx, c) in path.char_indices() {
        match c {
            '{' => start = Some(idx + 1),
            '}' => {
                if let Some(from) = start.take() {
                    let param = &path[from..idx];
                    if !param.is_empty() {
                        params.push(param);
                    }
                }
            }
            _ => {}
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RestMethod;
    use serde_json::json;

    fn order_path() -> Path {
        Path::new(
            "/store/order/{orderId}",
            json!({
                "get": { "operationId": "getOrderById" },
                "delete": { "operationId": "deleteOrder" }
            }),
        )
    }

    #[test]
    fn test_splits_static_segments() {
        let path = Path::new("/store/inventory", json!({}));
        assert_eq!(path.non_parameter_elements(), ["store", "inventory"]);
        assert!(path.parameter_elements().is_empty());
    }

    #[test]
    fn test_splits_parameter_segments() {
        let path = order_path();
        assert_eq!(path.non_parameter_elements(), ["store", "order"]);
        assert_eq!(path.parameter_elements(), ["orderId"]);
    }

    #[test]
    fn test_parameters_keep_template_order() {
        let path = Path::new("/users/{userId}/posts/{postId}/{a}-{b}", json!({}));
        assert_eq!(path.non_parameter_elements(), ["users", "posts"]);
        assert_eq!(path.parameter_elements(), ["userId", "postId", "a", "b"]);
    }

    #[test]
    fn test_builds_one_operation_per_verb() {
        let path = order_path();
        let operations = path.operations().unwrap();
        let ids: Vec<_> = operations.iter().map(|op| op.id()).collect();
        assert_eq!(ids, ["getOrderById", "deleteOrder"]);
        assert_eq!(operations[1].verb(), RestMethod::Delete);
    }

    #[test]
    fn test_memoizes_operations() {
        let path = order_path();
        let first = path.operations().unwrap().as_ptr();
        let second = path.operations().unwrap().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_non_mapping_operations() {
        let path = Path::new("/pets", json!(["get"]));
        assert!(matches!(
            path.operations(),
            Err(SchemaError::OperationsNotMapping { path }) if path == "/pets"
        ));
    }

    #[test]
    fn test_merges_path_level_parameters() {
        let path = Path::new(
            "/pets",
            json!({
                "parameters": [{ "name": "X-Trace", "in": "header" }],
                "x-internal": true,
                "get": { "operationId": "listPets" }
            }),
        );
        let operations = path.operations().unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].header_parameter_names(), ["x-trace"]);
    }

    #[test]
    fn test_skips_path_item_references() {
        let path = Path::new(
            "/pets",
            json!({
                "$ref": "#/x-shared/pets",
                "get": { "operationId": "listPets" }
            }),
        );
        let operations = path.operations().unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].id(), "listPets");
    }

    #[test]
    fn test_extract_consecutive_params() {
        assert_eq!(extract_path_params("/{a}/{b}"), vec!["a", "b"]);
        assert_eq!(extract_path_params("/{}"), Vec::<&str>::new());
    }
}

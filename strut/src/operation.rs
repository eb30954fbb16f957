//! Swagger operations.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;
use crate::method::RestMethod;

/// Where a declared parameter travels, per its `in` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
    #[serde(other)]
    Other,
}

/// A parameter declared by an operation's `parameters` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeclaredParameter {
    /// Parameter name as declared in the document.
    pub name: String,
    /// The parameter's `in` field.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the document marks the parameter as required.
    #[serde(default)]
    pub required: bool,
}

impl DeclaredParameter {
    /// Parses a raw `parameters` array.
    ///
    /// Entries without `name`/`in` (e.g. `$ref`s to shared definitions) are
    /// skipped.
    pub(crate) fn parse_list(raw: &Value) -> Vec<Self> {
        let Some(entries) = raw.as_array() else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| match Self::deserialize(entry) {
                Ok(parameter) => Some(parameter),
                Err(e) => {
                    debug!(error = %e, "skipping unrecognized parameter declaration");
                    None
                }
            })
            .collect()
    }
}

/// One verb's definition under a [`Path`](crate::path::Path).
#[derive(Debug, Clone)]
pub struct Operation {
    verb: RestMethod,
    id: String,
    path: String,
    definition: Value,
    parameters: Vec<DeclaredParameter>,
}

impl Operation {
    /// Validates and wraps a raw operation definition.
    ///
    /// `shared` holds the path-level parameters; an operation-level
    /// declaration with the same name and location replaces the shared one.
    ///
    /// ## Errors
    ///
    /// - [`SchemaError::UnsupportedVerb`] if `verb` is not an HTTP method
    /// - [`SchemaError::MissingOperationId`] if `operationId` is absent or
    ///   not a string
    pub fn new(
        verb: &str,
        definition: &Value,
        path: &str,
        shared: &[DeclaredParameter],
    ) -> Result<Self, SchemaError> {
        let method = verb
            .parse::<RestMethod>()
            .map_err(|_| SchemaError::UnsupportedVerb {
                path: path.to_string(),
                verb: verb.to_string(),
            })?;

        let id = definition
            .get("operationId")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::MissingOperationId {
                path: path.to_string(),
                verb: verb.to_string(),
            })?
            .to_string();

        let own = definition
            .get("parameters")
            .map(DeclaredParameter::parse_list)
            .unwrap_or_default();

        let mut parameters: Vec<DeclaredParameter> = shared
            .iter()
            .filter(|s| {
                !own.iter()
                    .any(|o| o.name == s.name && o.location == s.location)
            })
            .cloned()
            .collect();
        parameters.extend(own);

        Ok(Self {
            verb: method,
            id,
            path: path.to_string(),
            definition: definition.clone(),
            parameters,
        })
    }

    /// The operation's verb.
    pub fn verb(&self) -> RestMethod {
        self.verb
    }

    /// The unique `operationId`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Template of the owning path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw definition object.
    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// All declared parameters, path-level ones first.
    pub fn parameters(&self) -> &[DeclaredParameter] {
        &self.parameters
    }

    /// Lowercased names of the parameters declared `in: header`.
    pub fn header_parameter_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Header)
            .map(|p| p.name.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exposes_id_and_verb() {
        let op = Operation::new("get", &json!({ "operationId": "getPetById" }), "/pet/{petId}", &[])
            .unwrap();
        assert_eq!(op.id(), "getPetById");
        assert_eq!(op.verb(), RestMethod::Get);
        assert_eq!(op.path(), "/pet/{petId}");
    }

    #[test]
    fn test_requires_string_operation_id() {
        let missing = Operation::new("get", &json!({}), "/pet", &[]);
        assert!(matches!(missing, Err(SchemaError::MissingOperationId { .. })));

        let numeric = Operation::new("get", &json!({ "operationId": 7 }), "/pet", &[]);
        assert!(matches!(numeric, Err(SchemaError::MissingOperationId { .. })));
    }

    #[test]
    fn test_rejects_unknown_verbs() {
        let result = Operation::new("fetch", &json!({ "operationId": "x" }), "/pet", &[]);
        assert!(matches!(
            result,
            Err(SchemaError::UnsupportedVerb { verb, .. }) if verb == "fetch"
        ));
    }

    #[test]
    fn test_collects_header_parameters() {
        let op = Operation::new(
            "post",
            &json!({
                "operationId": "addPet",
                "parameters": [
                    { "name": "Authorization", "in": "header" },
                    { "name": "body", "in": "body", "required": true },
                    { "$ref": "#/parameters/limit" }
                ]
            }),
            "/pet",
            &[],
        )
        .unwrap();

        assert_eq!(op.parameters().len(), 2);
        assert!(op.parameters()[1].required);
        assert_eq!(op.header_parameter_names(), ["authorization"]);
    }

    #[test]
    fn test_operation_parameters_override_shared_ones() {
        let shared = vec![DeclaredParameter {
            name: "limit".to_string(),
            location: ParameterLocation::Query,
            required: false,
        }];
        let op = Operation::new(
            "get",
            &json!({
                "operationId": "listPets",
                "parameters": [{ "name": "limit", "in": "query", "required": true }]
            }),
            "/pets",
            &shared,
        )
        .unwrap();

        assert_eq!(op.parameters().len(), 1);
        assert!(op.parameters()[0].required);
    }
}

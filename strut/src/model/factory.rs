//! Model types synthesized from schema definitions.
//!
//! A Swagger `definitions` object is turned into a [`Models`] set: one
//! [`ModelType`] per definition, keyed by its type identifier. Instances are
//! created through [`Models::instantiate`] so nested `$ref` properties can be
//! resolved against their siblings.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::{DeclaredType, Model, Parameter};
use crate::error::{ArgumentError, ModelError, SchemaError, StrutError};
use crate::identifier::constant_identifier;

/// How a property's values are typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// A plain `type` declaration.
    Typed(DeclaredType),
    /// A `$ref` to another definition, holding the referenced name (the last
    /// `/` segment of the reference).
    Reference(String),
}

/// One declared property of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    name: String,
    kind: PropertyKind,
    permitted_values: Vec<Value>,
}

impl PropertyDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn permitted_values(&self) -> &[Value] {
        &self.permitted_values
    }

    /// Name of the referenced definition for `$ref` properties.
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Reference(target) => Some(target),
            PropertyKind::Typed(_) => None,
        }
    }

    fn parse(model: &str, name: &str, raw: &Value) -> Result<Self, SchemaError> {
        let permitted_values = raw
            .get("enum")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let kind = if let Some(reference) = raw.get("$ref").and_then(Value::as_str) {
            let target = reference.rsplit('/').next().unwrap_or(reference);
            PropertyKind::Reference(target.to_string())
        } else if let Some(declared) = raw.get("type").and_then(Value::as_str) {
            PropertyKind::Typed(DeclaredType::from(declared))
        } else {
            return Err(SchemaError::invalid_definition(
                model,
                format!("property `{name}` has neither `type` nor `$ref`"),
            ));
        };

        Ok(Self {
            name: name.to_string(),
            kind,
            permitted_values,
        })
    }
}

/// The shape of one schema definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelType {
    name: String,
    identifier: String,
    properties: Vec<PropertyDefinition>,
    required: Vec<String>,
}

impl ModelType {
    /// Parses a single definition object.
    ///
    /// A definition without `properties` has no attributes.
    ///
    /// ## Errors
    ///
    /// Returns [`SchemaError::InvalidDefinition`] if the definition is not an
    /// object or a property declares neither `type` nor `$ref`.
    pub fn from_definition(name: &str, raw: &Value) -> Result<Self, SchemaError> {
        let Value::Object(definition) = raw else {
            return Err(SchemaError::invalid_definition(name, "expected an object"));
        };

        let empty = Map::new();
        let raw_properties = match definition.get("properties") {
            None => &empty,
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(SchemaError::invalid_definition(
                    name,
                    "`properties` must be an object",
                ));
            }
        };

        let properties = raw_properties
            .iter()
            .map(|(property, raw)| PropertyDefinition::parse(name, property, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let required = definition
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            identifier: constant_identifier(name),
            properties,
            required,
        })
    }

    /// The definition's key in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type identifier the definition is registered under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Declared property names in document order.
    pub fn attributes(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }

    /// The definition's `required` list, as written.
    pub fn required_attributes(&self) -> &[String] {
        &self.required
    }

    /// Properties declared through `$ref`.
    pub fn nested_models(&self) -> Vec<&PropertyDefinition> {
        self.properties
            .iter()
            .filter(|p| p.reference().is_some())
            .collect()
    }

    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn is_required(&self, attribute: &str) -> bool {
        self.required.iter().any(|r| r == attribute)
    }

    /// A fresh, unset [`Parameter`] carrying the attribute's metadata.
    ///
    /// References are typed by the referenced name so that anything other
    /// than a nested model fails the type check.
    pub(crate) fn parameter_for(&self, attribute: &str) -> Option<Parameter> {
        let property = self.property(attribute)?;
        let declared = match &property.kind {
            PropertyKind::Typed(declared) => declared.clone(),
            PropertyKind::Reference(target) => DeclaredType::Other(target.clone()),
        };
        Some(
            Parameter::new(declared)
                .with_permitted_values(property.permitted_values.clone())
                .required(self.is_required(attribute)),
        )
    }
}

/// A set of model types defined together.
///
/// Cloning is cheap; clones share the same types.
#[derive(Debug, Clone, Default)]
pub struct Models {
    types: Arc<BTreeMap<String, Arc<ModelType>>>,
}

impl Models {
    /// Looks a type up by definition name or type identifier.
    pub fn get(&self, name: &str) -> Option<&Arc<ModelType>> {
        self.types
            .get(name)
            .or_else(|| self.types.get(&constant_identifier(name)))
    }

    /// Type identifiers of every defined model, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelType>> {
        self.types.values()
    }

    /// Creates a new instance of `name`.
    ///
    /// Required scalar attributes start unset. Required `$ref` attributes are
    /// filled with fresh instances of the referenced sibling type, recursively.
    /// A required reference back to a type that is already being built stays
    /// unset.
    ///
    /// ## Errors
    ///
    /// Returns [`ModelError::UnknownModel`] if `name`, or a required nested
    /// reference, is not part of this set.
    pub fn instantiate(&self, name: &str) -> Result<Model, ModelError> {
        let mut building = Vec::new();
        self.instantiate_guarded(name, &mut building)
    }

    fn instantiate_guarded(
        &self,
        name: &str,
        building: &mut Vec<String>,
    ) -> Result<Model, ModelError> {
        let model_type = self
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::UnknownModel {
                name: constant_identifier(name),
            })?;

        building.push(model_type.identifier().to_string());
        let mut model = Model::blank(Arc::clone(&model_type));

        for attribute in model_type.required_attributes() {
            let Some(property) = model_type.property(attribute) else {
                continue;
            };
            match property.reference() {
                None => model.unset(attribute)?,
                Some(target) => {
                    let identifier = constant_identifier(target);
                    if building.contains(&identifier) {
                        debug!(
                            model = model_type.identifier(),
                            attribute, "leaving recursive reference unset"
                        );
                        model.unset(attribute)?;
                    } else {
                        let nested = self.instantiate_guarded(&identifier, building)?;
                        model.set(attribute, nested)?;
                    }
                }
            }
        }

        building.pop();
        Ok(model)
    }
}

/// Builds [`Models`] from model definition documents.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
/// use strut::model::ModelFactory;
///
/// let models = ModelFactory::define_models(&json!({
///     "definitions": {
///         "Pet": {
///             "required": ["name"],
///             "properties": { "name": { "type": "string" } }
///         }
///     }
/// }))
/// .unwrap();
///
/// let mut pet = models.instantiate("Pet").unwrap();
/// assert!(!pet.is_valid());
/// pet.set("name", "Rex").unwrap();
/// assert!(pet.is_valid());
/// ```
pub struct ModelFactory;

impl ModelFactory {
    /// Defines one model type per entry of the document's `definitions`.
    ///
    /// ## Errors
    ///
    /// - [`SchemaError::MissingDefinitions`] if `definitions` is absent or not
    ///   an object
    /// - [`SchemaError::InvalidDefinition`] for malformed definitions
    pub fn define_models(document: &Value) -> Result<Models, SchemaError> {
        let Some(Value::Object(definitions)) = document.get("definitions") else {
            return Err(SchemaError::MissingDefinitions);
        };

        let mut types = BTreeMap::new();
        for (name, raw) in definitions {
            let model_type = ModelType::from_definition(name, raw)?;
            debug!(
                model = model_type.identifier(),
                attributes = model_type.properties().len(),
                "defined model"
            );
            types.insert(model_type.identifier().to_string(), Arc::new(model_type));
        }

        Ok(Models {
            types: Arc::new(types),
        })
    }

    /// Parses `source` as JSON and defines its models. `None` yields `None`.
    pub fn from_json_str(source: Option<&str>) -> Result<Option<Models>, StrutError> {
        let Some(source) = source else {
            return Ok(None);
        };
        let document: Value = serde_json::from_str(source).map_err(ArgumentError::from)?;
        Ok(Some(Self::define_models(&document)?))
    }

    /// Reads a JSON file and defines its models. `None` yields `None`.
    pub async fn from_file(path: Option<&Path>) -> Result<Option<Models>, StrutError> {
        let Some(path) = path else {
            return Ok(None);
        };
        let source = tokio::fs::read_to_string(path).await.map_err(|source| {
            ArgumentError::UnreadableFile {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::from_json_str(Some(&source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pet_store() -> Value {
        json!({
            "definitions": {
                "Category": {
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" }
                    }
                },
                "Pet": {
                    "required": ["name", "category"],
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" },
                        "category": { "$ref": "#/definitions/Category" },
                        "status": { "type": "string", "enum": ["available", "sold"] }
                    }
                }
            }
        })
    }

    #[test]
    fn test_defines_one_type_per_definition() {
        let models = ModelFactory::define_models(&pet_store()).unwrap();
        assert_eq!(models.names(), ["Category", "Pet"]);
    }

    #[test]
    fn test_exposes_attribute_metadata() {
        let models = ModelFactory::define_models(&pet_store()).unwrap();
        let pet = models.get("Pet").unwrap();
        assert_eq!(pet.attributes(), ["id", "name", "category", "status"]);
        assert_eq!(pet.required_attributes(), ["name", "category"]);

        let nested: Vec<_> = pet.nested_models().iter().map(|p| p.name()).collect();
        assert_eq!(nested, ["category"]);
        assert_eq!(pet.property("category").unwrap().reference(), Some("Category"));
        assert_eq!(pet.property("status").unwrap().permitted_values().len(), 2);
    }

    #[test]
    fn test_lookup_accepts_definition_names() {
        let models = ModelFactory::define_models(&json!({
            "definitions": { "api-response": { "properties": {} } }
        }))
        .unwrap();
        assert!(models.get("api-response").is_some());
        assert!(models.get("ApiResponse").is_some());
    }

    #[test]
    fn test_missing_definitions_is_an_error() {
        assert!(matches!(
            ModelFactory::define_models(&json!({ "paths": {} })),
            Err(SchemaError::MissingDefinitions)
        ));
    }

    #[test]
    fn test_untyped_property_is_an_error() {
        let result = ModelFactory::define_models(&json!({
            "definitions": { "Pet": { "properties": { "name": { "description": "?" } } } }
        }));
        assert!(matches!(
            result,
            Err(SchemaError::InvalidDefinition { model, .. }) if model == "Pet"
        ));
    }

    #[test]
    fn test_definition_without_properties_has_no_attributes() {
        let models = ModelFactory::define_models(&json!({
            "definitions": { "Empty": { "type": "object" } }
        }))
        .unwrap();
        assert!(models.get("Empty").unwrap().attributes().is_empty());
    }

    #[test]
    fn test_instantiate_fills_required_nested_models() {
        let models = ModelFactory::define_models(&pet_store()).unwrap();
        let pet = models.instantiate("Pet").unwrap();

        assert!(pet.get("name").unwrap().is_unset());
        let category = pet.get("category").unwrap().as_model().unwrap();
        assert_eq!(category.model_type().identifier(), "Category");
        assert!(!pet.is_present("id"));
    }

    #[test]
    fn test_instantiate_unknown_model() {
        let models = ModelFactory::define_models(&pet_store()).unwrap();
        assert!(matches!(
            models.instantiate("Dog"),
            Err(ModelError::UnknownModel { name }) if name == "Dog"
        ));
    }

    #[test]
    fn test_required_nested_model_must_be_registered() {
        let models = ModelFactory::define_models(&json!({
            "definitions": {
                "Pet": {
                    "required": ["owner"],
                    "properties": { "owner": { "$ref": "#/definitions/User" } }
                }
            }
        }))
        .unwrap();
        assert!(matches!(
            models.instantiate("Pet"),
            Err(ModelError::UnknownModel { name }) if name == "User"
        ));
    }

    #[test]
    fn test_recursive_required_reference_stays_unset() {
        let models = ModelFactory::define_models(&json!({
            "definitions": {
                "Node": {
                    "required": ["next"],
                    "properties": { "next": { "$ref": "#/definitions/Node" } }
                }
            }
        }))
        .unwrap();
        let node = models.instantiate("Node").unwrap();
        assert!(node.get("next").unwrap().is_unset());
    }

    #[test]
    fn test_from_json_str_passes_none_through() {
        assert!(ModelFactory::from_json_str(None).unwrap().is_none());
    }

    #[test]
    fn test_from_json_str_rejects_bad_json() {
        assert!(matches!(
            ModelFactory::from_json_str(Some("foo")),
            Err(StrutError::Argument(ArgumentError::InvalidJson(_)))
        ));
    }

    #[test]
    fn test_from_json_str_defines_models() {
        let models = ModelFactory::from_json_str(Some(&pet_store().to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(models.len(), 2);
    }

    #[tokio::test]
    async fn test_from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        std::fs::write(&path, pet_store().to_string()).unwrap();

        let models = ModelFactory::from_file(Some(&path)).await.unwrap().unwrap();
        assert!(models.get("Pet").is_some());
        assert!(ModelFactory::from_file(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_from_file_reports_missing_file() {
        let result = ModelFactory::from_file(Some(Path::new("/nonexistent/models.json"))).await;
        assert!(matches!(
            result,
            Err(StrutError::Argument(ArgumentError::UnreadableFile { .. }))
        ));
    }
}

//! Model instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::{FieldValue, ModelType, Parameter, ValidationErrors};
use crate::error::ModelError;

static UNSET: FieldValue = FieldValue::Unset;

/// An instance of a [`ModelType`], holding one [`Parameter`] per attribute
/// that has been written.
///
/// Create instances with [`Models::instantiate`](super::Models::instantiate).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    model_type: Arc<ModelType>,
    parameters: BTreeMap<String, Parameter>,
}

impl Model {
    /// An instance with no attribute written yet.
    pub(crate) fn blank(model_type: Arc<ModelType>) -> Self {
        Self {
            model_type,
            parameters: BTreeMap::new(),
        }
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    pub fn attributes(&self) -> Vec<&str> {
        self.model_type.attributes()
    }

    pub fn required_attributes(&self) -> &[String] {
        self.model_type.required_attributes()
    }

    /// Names of the attributes declared through `$ref`.
    pub fn nested_models(&self) -> Vec<&str> {
        self.model_type
            .nested_models()
            .into_iter()
            .map(|p| p.name())
            .collect()
    }

    /// Assigns `value` to `attribute`.
    ///
    /// The backing [`Parameter`] is rebuilt from the schema whenever the
    /// attribute is not currently present, then only its value changes.
    ///
    /// ## Errors
    ///
    /// Returns [`ModelError::UnknownAttribute`] if the model does not declare
    /// `attribute`.
    pub fn set(&mut self, attribute: &str, value: impl Into<FieldValue>) -> Result<(), ModelError> {
        let needs_parameter = self
            .parameters
            .get(attribute)
            .is_none_or(|parameter| !parameter.is_present());

        if needs_parameter {
            let parameter = self
                .model_type
                .parameter_for(attribute)
                .ok_or_else(|| self.unknown(attribute))?;
            self.parameters.insert(attribute.to_string(), parameter);
        }

        if let Some(parameter) = self.parameters.get_mut(attribute) {
            parameter.set_value(value);
        }
        Ok(())
    }

    /// Resets `attribute` to unset.
    pub fn unset(&mut self, attribute: &str) -> Result<(), ModelError> {
        self.set(attribute, FieldValue::Unset)
    }

    /// Current value of `attribute`; `None` if the model does not declare it.
    pub fn get(&self, attribute: &str) -> Option<&FieldValue> {
        match self.parameters.get(attribute) {
            Some(parameter) => Some(parameter.value()),
            None => self.model_type.property(attribute).map(|_| &UNSET),
        }
    }

    /// Mutable access to a written attribute, e.g. to fill in a nested model.
    pub fn get_mut(&mut self, attribute: &str) -> Option<&mut FieldValue> {
        self.parameters.get_mut(attribute).map(Parameter::value_mut)
    }

    /// The backing parameter, once the attribute has been written.
    pub fn parameter(&self, attribute: &str) -> Option<&Parameter> {
        self.parameters.get(attribute)
    }

    pub fn is_present(&self, attribute: &str) -> bool {
        self.parameters
            .get(attribute)
            .is_some_and(Parameter::is_present)
    }

    /// Errors for every invalid attribute; empty when the model is valid.
    ///
    /// Attributes never written are not checked. Instances built by
    /// [`Models::instantiate`](super::Models::instantiate) write every
    /// required attribute up front.
    pub fn validate(&self) -> ValidationErrors {
        self.model_type
            .attributes()
            .into_iter()
            .filter_map(|attribute| {
                let parameter = self.parameters.get(attribute)?;
                parameter
                    .validate()
                    .err()
                    .map(|error| (attribute.to_string(), error))
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Present, non-null attributes in declaration order, nested models
    /// unwrapped. `None` when nothing would be emitted.
    pub fn to_plain_object(&self) -> Option<Map<String, Value>> {
        let structure: Map<String, Value> = self
            .model_type
            .attributes()
            .into_iter()
            .filter_map(|attribute| {
                let value = self.parameters.get(attribute)?.to_plain_value()?;
                Some((attribute.to_string(), value))
            })
            .collect();

        (!structure.is_empty()).then_some(structure)
    }

    /// JSON text of [`to_plain_object`](Self::to_plain_object); `null` when
    /// empty.
    pub fn to_json(&self) -> String {
        self.to_plain_object()
            .map(Value::Object)
            .unwrap_or(Value::Null)
            .to_string()
    }

    fn unknown(&self, attribute: &str) -> ModelError {
        ModelError::UnknownAttribute {
            model: self.model_type.identifier().to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plain_object().serialize(serializer)
    }
}

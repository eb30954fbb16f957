//! Validated value slots.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::FieldValue;

/// Errors reported by [`Model::validate`](super::Model::validate), keyed by
/// attribute name.
pub type ValidationErrors = BTreeMap<String, FieldError>;

/// Why a single parameter is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Human-readable message, e.g. `Invalid parameter: Missing required parameter`.
    Invalid(String),
    /// The parameter holds a model which is itself invalid.
    Nested(ValidationErrors),
}

impl FieldError {
    /// Returns the message for a scalar failure.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Invalid(message) => Some(message),
            Self::Nested(_) => None,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(message) => f.write_str(message),
            Self::Nested(errors) => {
                let rendered: Vec<String> = errors
                    .iter()
                    .map(|(attribute, error)| format!("{attribute}: {error}"))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Type declared for a schema property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    String,
    Boolean,
    Number,
    Integer,
    Array,
    /// Accepts any value.
    Object,
    /// Any type name this crate does not know; values never pass.
    Other(String),
}

impl DeclaredType {
    /// The type name as written in the schema.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other(name) => name,
        }
    }

    fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Object, _) => true,
            (Self::String, FieldValue::Json(v)) => v.is_string(),
            (Self::Boolean, FieldValue::Json(v)) => v.is_boolean(),
            (Self::Number | Self::Integer, FieldValue::Json(v)) => v.is_number(),
            (Self::Array, FieldValue::Json(v)) => v.is_array(),
            // Elements that can validate themselves must be valid.
            (Self::Array, FieldValue::Array(items)) => items
                .iter()
                .all(|item| item.as_model().is_none_or(|model| model.is_valid())),
            _ => false,
        }
    }
}

impl From<&str> for DeclaredType {
    fn from(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed, optionally enum-constrained, optionally required field.
///
/// ## Examples
///
/// ```
/// use strut::model::Parameter;
///
/// let mut name = Parameter::new("string").required(true);
/// assert_eq!(
///     name.validate().unwrap_err().to_string(),
///     "Invalid parameter: Missing required parameter"
/// );
///
/// name.set_value("Rex");
/// assert!(name.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    declared_type: DeclaredType,
    permitted_values: Vec<Value>,
    required: bool,
    value: FieldValue,
}

impl Parameter {
    /// Creates an optional, unconstrained, unset parameter.
    pub fn new(declared_type: impl Into<DeclaredType>) -> Self {
        Self {
            declared_type: declared_type.into(),
            permitted_values: Vec::new(),
            required: false,
            value: FieldValue::Unset,
        }
    }

    /// Restricts the parameter to `values`; an empty list means unconstrained.
    pub fn with_permitted_values(mut self, values: Vec<Value>) -> Self {
        self.permitted_values = values;
        self
    }

    /// Marks the parameter as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    pub fn permitted_values(&self) -> &[Value] {
        &self.permitted_values
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut FieldValue {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
    }

    /// `true` once any value, `null` included, has been assigned.
    pub fn is_present(&self) -> bool {
        !self.value.is_unset()
    }

    /// The plain value if present, `None` otherwise.
    pub fn to_plain_value(&self) -> Option<Value> {
        self.value.to_plain()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks the current value against the declared constraints.
    ///
    /// Optional unset parameters are always valid. A nested model reports
    /// its own errors and skips the type/enum checks. Otherwise every
    /// failing check contributes a message.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.required && self.value.is_unset() {
            return Ok(());
        }

        if let Some(model) = self.value.as_model() {
            let errors = model.validate();
            return if errors.is_empty() {
                Ok(())
            } else {
                Err(FieldError::Nested(errors))
            };
        }

        let mut messages = Vec::new();

        let skip_type_check = self.value.is_unset() || (!self.required && self.value.is_null());
        if !skip_type_check && !self.declared_type.accepts(&self.value) {
            messages.push(format!(
                "Expected valid {}, but was {}",
                self.declared_type,
                self.value.inspect()
            ));
        }

        if !self.is_permitted() {
            let permitted: Vec<String> = self.permitted_values.iter().map(Value::to_string).collect();
            messages.push(format!(
                "Expected one of [{}], but was {}",
                permitted.join(", "),
                self.value.inspect()
            ));
        }

        if self.required && self.value.is_unset() {
            messages.push("Missing required parameter".to_string());
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(FieldError::Invalid(format!(
                "Invalid parameter: {}",
                messages.join(", ")
            )))
        }
    }

    fn is_permitted(&self) -> bool {
        if self.permitted_values.is_empty() {
            return true;
        }
        match &self.value {
            FieldValue::Unset => false,
            FieldValue::Json(value) => self.permitted_values.contains(value),
            other => other
                .to_plain()
                .is_some_and(|plain| self.permitted_values.contains(&plain)),
        }
    }
}

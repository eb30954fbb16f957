//! Values held by model parameters.

use serde_json::Value;

use super::Model;

/// The value slot of a [`Parameter`](super::Parameter).
///
/// [`FieldValue::Unset`] means "never assigned" and is distinct from every
/// real value, including `null`, `false` and `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Never assigned.
    #[default]
    Unset,
    /// Any plain JSON value, `null` included.
    Json(Value),
    /// A nested model instance.
    Model(Box<Model>),
    /// A list that may mix plain values and nested models.
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Unset`].
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns `true` for a JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Returns the nested model, if this value is one.
    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Mutable access to the nested model, if this value is one.
    pub fn as_model_mut(&mut self) -> Option<&mut Model> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Returns the plain JSON form, or `None` when there is nothing to emit.
    ///
    /// Unset values, `null`s and models with no present attributes all map
    /// to `None`. Inside arrays those become `null` to keep positions.
    pub fn to_plain(&self) -> Option<Value> {
        match self {
            Self::Unset | Self::Json(Value::Null) => None,
            Self::Json(value) => Some(value.clone()),
            Self::Model(model) => model.to_plain_object().map(Value::Object),
            Self::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| item.to_plain().unwrap_or(Value::Null))
                    .collect(),
            )),
        }
    }

    /// Debug-style rendering used in validation messages.
    pub fn inspect(&self) -> String {
        match self {
            Self::Unset => "unset".to_string(),
            Self::Json(value) => value.to_string(),
            Self::Model(model) => {
                format!("#<{} {}>", model.model_type().identifier(), model.to_json())
            }
            Self::Array(items) => {
                let rendered: Vec<String> = items.iter().map(Self::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Model> for FieldValue {
    fn from(model: Model) -> Self {
        Self::Model(Box::new(model))
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        Self::Array(items)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Json(Value::from(value))
    }
}

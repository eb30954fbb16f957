//! Model usage errors.

use thiserror::Error;

/// Errors from synthesized models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The attribute is not declared by the model's definition.
    #[error("`{model}` has no attribute `{attribute}`")]
    UnknownAttribute {
        /// Model type name.
        model: String,
        /// Attribute that was requested.
        attribute: String,
    },

    /// A nested `$ref` names a model that is not registered alongside.
    #[error("Unknown model `{name}`")]
    UnknownModel {
        /// Type identifier that was looked up.
        name: String,
    },
}

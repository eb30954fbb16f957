//! Document validation errors.

use thiserror::Error;

/// The document does not declare `swagger: "2.0"`.
#[derive(Debug, Error)]
#[error("Invalid Swagger version spec supplied ({found}). Only Swagger v2.0 is supported")]
pub struct VersionError {
    /// The `swagger` value found in the document, or `missing`.
    pub found: String,
}

impl VersionError {
    /// Creates a version error naming the offending value.
    pub fn new(found: impl Into<String>) -> Self {
        Self {
            found: found.into(),
        }
    }
}

/// Structural problems in a Swagger document.
///
/// Raised at build time; a client is never produced from a document that
/// fails any of these checks.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// `paths` is absent or not an object.
    #[error("Expected JSON to contain an object of valid paths")]
    InvalidPaths,

    /// `host` is absent or not a string.
    #[error("`host` field in JSON is invalid")]
    InvalidHost,

    /// `basePath` is absent or not a string.
    #[error("`basePath` field in JSON is invalid")]
    InvalidBasePath,

    /// A path entry is not a verb -> operation object.
    #[error("Expected the path `{path}` to contain a list of operations")]
    OperationsNotMapping {
        /// The path template.
        path: String,
    },

    /// An operation has no string `operationId`.
    #[error("Operation `{verb} {path}` is missing mandatory `operationId` field")]
    MissingOperationId {
        /// The path template.
        path: String,
        /// The operation verb.
        verb: String,
    },

    /// An operation key is not an HTTP verb.
    #[error("Unsupported HTTP verb `{verb}` for path `{path}`")]
    UnsupportedVerb {
        /// The path template.
        path: String,
        /// The unrecognized key.
        verb: String,
    },

    /// A models document has no `definitions` object.
    #[error("Expected JSON to contain an object of model definitions")]
    MissingDefinitions,

    /// A model definition cannot be interpreted.
    #[error("Invalid definition for model `{model}`: {reason}")]
    InvalidDefinition {
        /// The definition name.
        model: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl SchemaError {
    /// Creates an invalid definition error.
    pub fn invalid_definition(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_names_value() {
        let err = VersionError::new("1.2");
        assert!(err.to_string().contains("1.2"));
    }

    #[test]
    fn test_missing_operation_id() {
        let err = SchemaError::MissingOperationId {
            path: "/pet".to_string(),
            verb: "get".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Operation `get /pet` is missing mandatory `operationId` field"
        );
    }

    #[test]
    fn test_invalid_definition() {
        let err = SchemaError::invalid_definition("Pet", "missing properties");
        assert_eq!(
            err.to_string(),
            "Invalid definition for model `Pet`: missing properties"
        );
    }
}

//! Call-time parameter errors.

use thiserror::Error;

/// Errors raised while assembling a request for a generated call.
///
/// These are fatal for the call that raised them and leave shared state
/// untouched.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// A `{name}` placeholder in the path template had no matching argument.
    #[error("Required parameter `{name}` missing")]
    MissingPathParameter {
        /// The placeholder name.
        name: String,
    },
}

impl ParameterError {
    /// Creates a missing path parameter error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingPathParameter { name: name.into() }
    }

    /// Returns the name of the parameter this error refers to.
    pub fn parameter(&self) -> &str {
        match self {
            Self::MissingPathParameter { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display() {
        let err = ParameterError::missing("orderId");
        assert_eq!(err.to_string(), "Required parameter `orderId` missing");
        assert_eq!(err.parameter(), "orderId");
    }
}

//! Invalid caller input.

use thiserror::Error;

/// Errors caused by arguments handed to [`create`](crate::create) or to a
/// generated call.
///
/// These are programmer errors: they are surfaced immediately and never
/// retried.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// Neither a URL nor an inline document was supplied.
    #[error("Either a url or a spec document must be provided")]
    MissingSource,

    /// The document URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The document is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("Invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Call arguments must be a JSON object (or null for no arguments).
    #[error("Request parameters must be an object, got {found}")]
    InvalidParams {
        /// JSON kind that was supplied instead.
        found: &'static str,
    },

    /// A document file could not be read.
    #[error("Could not read `{path}`: {source}")]
    UnreadableFile {
        /// The file that was requested.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No generated operation has this name.
    #[error("Unknown operation `{name}` in `{namespace}`")]
    UnknownOperation {
        /// Namespace that was searched.
        namespace: String,
        /// Callable name that was requested.
        name: String,
    },

    /// A header name or value cannot be sent over HTTP.
    #[error("Invalid header `{name}`: {reason}")]
    InvalidHeader {
        /// Offending header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_display() {
        assert_eq!(
            ArgumentError::MissingSource.to_string(),
            "Either a url or a spec document must be provided"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err: ArgumentError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid URL"));
    }

    #[test]
    fn test_invalid_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ArgumentError::from(json_err);
        assert!(err.to_string().starts_with("Invalid JSON"));
    }
}

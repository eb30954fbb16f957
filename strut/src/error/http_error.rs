//! Uniform HTTP error wrapper.

use thiserror::Error;

use super::ClientError;

/// Wraps every transport failure behind one error kind.
///
/// The original [`ClientError`] stays reachable through
/// [`std::error::Error::source`] and [`HttpError::client_error`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    message: String,
    #[source]
    source: ClientError,
}

impl HttpError {
    /// Wraps `source` with a custom message.
    pub fn with_message(message: impl Into<String>, source: ClientError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }

    /// Wraps a failed document download from `url`.
    pub fn fetch(url: &str, source: ClientError) -> Self {
        Self::with_message(format!("Could not get API json from {url}"), source)
    }

    /// Returns the wrapped transport error.
    pub fn client_error(&self) -> &ClientError {
        &self.source
    }

    /// Returns the HTTP status, when the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        self.source.status_code()
    }
}

impl From<ClientError> for HttpError {
    fn from(source: ClientError) -> Self {
        Self {
            message: source.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_message_defaults_to_cause() {
        let err = HttpError::from(ClientError::Timeout { duration_ms: 500 });
        assert_eq!(err.to_string(), "Request timeout after 500ms");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_fetch_names_url() {
        let err = HttpError::fetch(
            "http://example.com/swagger.json",
            ClientError::Connection("refused".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Could not get API json from http://example.com/swagger.json"
        );
        assert!(matches!(err.client_error(), ClientError::Connection(_)));
    }

    #[test]
    fn test_status_code_passthrough() {
        let err = HttpError::from(ClientError::HttpStatus {
            status: 404,
            message: "Not Found".to_string(),
        });
        assert_eq!(err.status_code(), Some(404));
    }
}

//! Transport-level errors.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by a [`Transport`](crate::transport::Transport).
///
/// These never reach callers directly: the dispatcher and the document fetcher
/// wrap them in [`HttpError`](super::HttpError).
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to a protocol or body error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Response body, or the canonical reason when the body was unreadable.
        message: String,
    },

    /// Request exceeded its timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        duration_ms: u64,
    },

    /// Failed to establish a connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl ClientError {
    /// Classifies a `reqwest` failure.
    ///
    /// Timeouts and connect failures get their own variants so callers can
    /// tell them apart without digging into `reqwest`.
    pub fn classify(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        if err.is_timeout() {
            let duration_ms = timeout.map(|t| t.as_millis() as u64).unwrap_or_default();
            return Self::Timeout { duration_ms };
        }
        if err.is_connect() {
            return Self::Connection(err.to_string());
        }
        Self::Request(err)
    }

    /// Returns `true` if this error is retryable.
    ///
    /// Nothing in this crate retries; the hint is for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
        }
    }

    /// Returns `true` for a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Returns the HTTP status code if this is an HTTP status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

//! Top-level error type.

use super::{ArgumentError, HttpError, ModelError, ParameterError, SchemaError, VersionError};
use thiserror::Error;

/// Top-level error type for all `strut` operations.
///
/// Aggregates every error category so callers can use `?` freely while still
/// matching on the specific failure when they need to.
///
/// ## Examples
///
/// ```rust,ignore
/// use strut::StrutError;
///
/// fn report(err: StrutError) {
///     match err {
///         StrutError::Version(e) => eprintln!("unsupported spec: {e}"),
///         StrutError::Http(e) => eprintln!("network: {e}"),
///         other => eprintln!("{other}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum StrutError {
    /// Invalid input handed to the entry point or to a generated call.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The document is not Swagger 2.0.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// The document is structurally invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A required path parameter was not supplied.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Misuse of a synthesized model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Transport failure during a document fetch or a generated call.
    #[error(transparent)]
    Http(#[from] HttpError),
}

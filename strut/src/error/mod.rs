//! Layered error types for the `strut` crate.
//!
//! The error hierarchy mirrors the ways building or calling a generated
//! client can fail:
//! - [`StrutError`] - Top-level error type for every public operation
//! - [`ArgumentError`] - Caller supplied unusable input to the entry point
//! - [`VersionError`] - The document is not a Swagger 2.0 spec
//! - [`SchemaError`] - The document is structurally invalid
//! - [`ParameterError`] - A generated call is missing a path parameter
//! - [`ModelError`] - Misuse of a synthesized model
//! - [`HttpError`] - Uniform wrapper around any [`ClientError`]
//! - [`ClientError`] - Transport-level failures

mod argument_error;
mod client_error;
mod http_error;
mod model_error;
mod parameter_error;
mod schema_error;
mod strut_error;

pub use argument_error::ArgumentError;
pub use client_error::ClientError;
pub use http_error::HttpError;
pub use model_error::ModelError;
pub use parameter_error::ParameterError;
pub use schema_error::{SchemaError, VersionError};
pub use strut_error::StrutError;

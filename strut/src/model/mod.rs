//! Typed value objects synthesized from schema definitions.
//!
//! Each definition becomes a [`ModelType`]; a [`Model`] is a record holding
//! one validated [`Parameter`] per attribute, looked up by name.

mod factory;
mod instance;
mod parameter;
mod value;

pub use factory::{ModelFactory, ModelType, Models, PropertyDefinition, PropertyKind};
pub use instance::Model;
pub use parameter::{DeclaredType, FieldError, Parameter, ValidationErrors};
pub use value::FieldValue;

//! Runtime API clients generated from Swagger 2.0 specifications.
//!
//! `strut` reads a Swagger 2.0 document (by URL or inline, JSON or YAML)
//! and builds, in memory, a tree of namespaces mirroring the API's paths,
//! with one callable per operation and one validated model type per schema
//! definition. Nothing is generated to disk.
//!
//! ## Features
//!
//! - **Namespaces from paths**: `/store/inventory` becomes `Store::Inventory`
//! - **Callables from operations**: `getPetById` becomes `get_pet_by_id`
//! - **Request assembly**: path templating, declared header parameters and
//!   layered headers
//! - **Models from definitions**: required/type/enum validation and JSON
//!   output, with nested `$ref` models
//! - **Async-first transport**: built on `reqwest` with `tokio`, pooled per
//!   middleware stack
//! - **Layered error handling**: one error kind per failure mode
//!
//! ## Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use strut::{CallOptions, CreateOptions, create};
//!
//! let petstore = create(None, Some(SPEC_JSON), "Petstore", CreateOptions::new()).await?;
//!
//! let response = petstore
//!     .lookup("Pet")
//!     .unwrap()
//!     .call("get_pet_by_id", json!({ "petId": 1 }), CallOptions::new())
//!     .await?;
//! println!("{}", response.body());
//!
//! let mut pet = petstore.models().instantiate("Pet")?;
//! pet.set("name", "Rex")?;
//! assert!(pet.is_valid());
//! ```

pub mod auth;
pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identifier;
pub mod method;
pub mod model;
pub mod namespace;
pub mod operation;
pub mod path;
pub mod registry;
pub mod response;
pub mod service;
pub mod transport;

// Re-exports for convenience
pub use auth::Auth;
pub use builder::SpecBuilder;
pub use config::{CallOptions, Configuration, CreateOptions};
pub use error::{
    ArgumentError, ClientError, HttpError, ModelError, ParameterError, SchemaError, StrutError,
    VersionError,
};
pub use method::RestMethod;
pub use model::{Model, ModelFactory, Models, Parameter};
pub use namespace::{GeneratedOperation, Namespace, NamespaceBuilder};
pub use operation::Operation;
pub use path::Path;
pub use registry::ServiceRegistry;
pub use response::Response;
pub use service::{SpecSource, create, create_from};

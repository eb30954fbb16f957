//! Builds a client from a parsed Swagger document.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{Configuration, CreateOptions};
use crate::error::{SchemaError, StrutError, VersionError};
use crate::model::{ModelFactory, Models};
use crate::namespace::{Namespace, NamespaceBuilder};
use crate::path::Path;
use crate::registry::ServiceRegistry;

/// The only Swagger version accepted.
pub const SUPPORTED_VERSION: &str = "2.0";

/// Validates a document and turns it into a registered [`Namespace`].
#[derive(Debug)]
pub struct SpecBuilder {
    document: Value,
    module_name: String,
    configuration: Arc<Configuration>,
}

impl SpecBuilder {
    /// Validates `document` and resolves the client configuration.
    ///
    /// `headers` are pre-resolved request headers; when `None` they are
    /// derived from `options`.
    ///
    /// ## Errors
    ///
    /// Checked in this order:
    /// - [`VersionError`] unless `swagger` is `"2.0"`
    /// - [`SchemaError::InvalidPaths`] unless `paths` is an object
    /// - [`SchemaError::InvalidHost`] unless `host` is a string
    /// - [`SchemaError::InvalidBasePath`] unless `basePath` is a string
    ///
    /// Configuration failures follow (see [`Configuration::resolve`]).
    pub fn new(
        document: Value,
        module_name: impl Into<String>,
        options: &CreateOptions,
        headers: Option<BTreeMap<String, String>>,
    ) -> Result<Self, StrutError> {
        validate(&document)?;

        let configuration = Configuration::resolve(
            options,
            document["host"].as_str().unwrap_or_default(),
            document["basePath"].as_str().unwrap_or_default(),
            headers.unwrap_or_else(|| options.resolved_headers()),
        )?;

        Ok(Self {
            document,
            module_name: module_name.into(),
            configuration: Arc::new(configuration),
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    pub fn host(&self) -> Option<&str> {
        self.document["host"].as_str()
    }

    pub fn base_path(&self) -> Option<&str> {
        self.document["basePath"].as_str()
    }

    /// One [`Path`] per entry of `paths`, in document order.
    pub fn paths(&self) -> Vec<Arc<Path>> {
        self.document["paths"]
            .as_object()
            .map(|paths| {
                paths
                    .iter()
                    .map(|(template, operations)| {
                        Arc::new(Path::new(template.as_str(), operations.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Models from `definitions`; empty when the document has none.
    pub fn models(&self) -> Result<Models, SchemaError> {
        if self.document.get("definitions").is_none() {
            return Ok(Models::default());
        }
        ModelFactory::define_models(&self.document)
    }

    /// Builds the namespace tree without registering it.
    ///
    /// ## Errors
    ///
    /// Returns the first [`SchemaError`] found in a path or definition.
    pub fn build(&self) -> Result<Namespace, SchemaError> {
        let mut root = Namespace::new(self.module_name.as_str());

        for path in self.paths() {
            let node = NamespaceBuilder::build(&path, &mut root, &self.configuration)?;
            debug!(path = path.template(), namespace = node.name(), "built path");
        }

        root.set_models(self.models()?);
        Ok(root)
    }

    /// Builds the namespace tree and registers it under the module name.
    #[instrument(skip(self), fields(module = %self.module_name))]
    pub fn make_resource(self) -> Result<Arc<Namespace>, StrutError> {
        let root = self.build()?;
        Ok(ServiceRegistry::register(root))
    }
}

fn validate(document: &Value) -> Result<(), StrutError> {
    match document.get("swagger") {
        Some(Value::String(version)) if version == SUPPORTED_VERSION => {}
        Some(Value::String(version)) => return Err(VersionError::new(version.as_str()).into()),
        Some(other) => return Err(VersionError::new(other.to_string()).into()),
        None => return Err(VersionError::new("missing").into()),
    }

    if !document["paths"].is_object() {
        return Err(SchemaError::InvalidPaths.into());
    }
    if !document["host"].is_string() {
        return Err(SchemaError::InvalidHost.into());
    }
    if !document["basePath"].is_string() {
        return Err(SchemaError::InvalidBasePath.into());
    }
    Ok(())
}

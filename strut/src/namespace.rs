//! The generated namespace tree.
//!
//! Every static path segment becomes a [`Namespace`] node named by its type
//! identifier (`/store/inventory` gives `Store` then `Inventory`), and every
//! operation becomes a [`GeneratedOperation`] stored on the node of its path
//! under its callable identifier.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{CallOptions, Configuration};
use crate::dispatch::dispatch;
use crate::error::{ArgumentError, SchemaError, StrutError};
use crate::identifier::{callable_identifier, constant_identifier};
use crate::method::RestMethod;
use crate::model::Models;
use crate::operation::Operation;
use crate::path::Path;
use crate::response::Response;
use crate::transport::BoxFuture;

/// Separator accepted by [`Namespace::lookup`].
pub const NAMESPACE_SEPARATOR: &str = "::";

type Handler = Arc<
    dyn Fn(Value, CallOptions, BTreeMap<String, String>) -> BoxFuture<'static, Result<Response, StrutError>>
        + Send
        + Sync,
>;

/// A callable generated for one operation.
///
/// The closure captures the operation, its path and the client
/// configuration; cloning is cheap.
#[derive(Clone)]
pub struct GeneratedOperation {
    name: String,
    operation: Arc<Operation>,
    path: Arc<Path>,
    handler: Handler,
}

impl GeneratedOperation {
    pub fn new(operation: Arc<Operation>, path: Arc<Path>, configuration: Arc<Configuration>) -> Self {
        let name = callable_identifier(operation.id());
        let handler: Handler = {
            let operation = Arc::clone(&operation);
            let path = Arc::clone(&path);
            Arc::new(
                move |params: Value,
                      options: CallOptions,
                      headers: BTreeMap<String, String>|
                      -> BoxFuture<'static, Result<Response, StrutError>> {
                    let operation = Arc::clone(&operation);
                    let path = Arc::clone(&path);
                    let configuration = Arc::clone(&configuration);
                    Box::pin(async move {
                        let args = request_arguments(params)?;
                        let response =
                            dispatch(&operation, &path, &configuration, args, &options, &headers)
                                .await?;
                        Ok::<Response, StrutError>(response)
                    })
                },
            )
        };

        Self {
            name,
            operation,
            path,
            handler,
        }
    }

    /// The callable identifier, e.g. `get_pet_by_id`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation_id(&self) -> &str {
        self.operation.id()
    }

    pub fn verb(&self) -> RestMethod {
        self.operation.verb()
    }

    pub fn path_template(&self) -> &str {
        self.path.template()
    }

    /// Performs the request.
    ///
    /// `params` must be a JSON object (or `null` for no arguments); its
    /// entries fill path placeholders, declared header parameters, then the
    /// query string or body.
    pub fn call(
        &self,
        params: Value,
        options: CallOptions,
    ) -> BoxFuture<'static, Result<Response, StrutError>> {
        (self.handler)(params, options, BTreeMap::new())
    }

    /// Like [`call`](Self::call), with headers that override every other
    /// header source.
    pub fn call_with_headers(
        &self,
        params: Value,
        options: CallOptions,
        headers: BTreeMap<String, String>,
    ) -> BoxFuture<'static, Result<Response, StrutError>> {
        (self.handler)(params, options, headers)
    }
}

impl fmt::Debug for GeneratedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedOperation")
            .field("name", &self.name)
            .field("operation_id", &self.operation.id())
            .field("verb", &self.operation.verb())
            .field("path", &self.path.template())
            .finish()
    }
}

fn request_arguments(params: Value) -> Result<Map<String, Value>, ArgumentError> {
    match params {
        Value::Object(args) => Ok(args),
        Value::Null => Ok(Map::new()),
        Value::Bool(_) => Err(ArgumentError::InvalidParams { found: "boolean" }),
        Value::Number(_) => Err(ArgumentError::InvalidParams { found: "number" }),
        Value::String(_) => Err(ArgumentError::InvalidParams { found: "string" }),
        Value::Array(_) => Err(ArgumentError::InvalidParams { found: "array" }),
    }
}

/// A node of the generated client.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    name: String,
    children: BTreeMap<String, Namespace>,
    operations: BTreeMap<String, GeneratedOperation>,
    models: Models,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct child by type identifier.
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.children.get(name)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.children.values()
    }

    /// Descendant by `::`-separated path; an empty path is `self`.
    ///
    /// ```
    /// use strut::Namespace;
    ///
    /// let root = Namespace::new("Petstore");
    /// assert_eq!(root.lookup("").map(|n| n.name()), Some("Petstore"));
    /// assert!(root.lookup("Store::Inventory").is_none());
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&Namespace> {
        path.split(NAMESPACE_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.namespace(segment))
    }

    /// Generated callable by name.
    pub fn operation(&self, name: &str) -> Option<&GeneratedOperation> {
        self.operations.get(name)
    }

    pub fn operations(&self) -> impl Iterator<Item = &GeneratedOperation> {
        self.operations.values()
    }

    /// Calls the operation named `name` on this node.
    ///
    /// ## Errors
    ///
    /// Returns [`ArgumentError::UnknownOperation`] if there is no such
    /// operation, otherwise whatever the call itself returns.
    pub async fn call(
        &self,
        name: &str,
        params: Value,
        options: CallOptions,
    ) -> Result<Response, StrutError> {
        let operation = self
            .operation(name)
            .ok_or_else(|| ArgumentError::UnknownOperation {
                namespace: self.name.clone(),
                name: name.to_string(),
            })?;
        operation.call(params, options).await
    }

    /// Models defined from the document's `definitions`.
    pub fn models(&self) -> &Models {
        &self.models
    }

    pub(crate) fn set_models(&mut self, models: Models) {
        self.models = models;
    }

    /// Returns the child named `identifier`, creating it if needed.
    fn child_mut(&mut self, identifier: String) -> &mut Namespace {
        self.children
            .entry(identifier)
            .or_insert_with_key(|name| Namespace::new(name.clone()))
    }

    fn install(&mut self, operation: GeneratedOperation) {
        debug!(
            namespace = %self.name,
            operation = operation.name(),
            "installing operation"
        );
        self.operations.insert(operation.name().to_string(), operation);
    }
}

/// Builds namespace nodes for paths and installs their operations.
pub struct NamespaceBuilder;

impl NamespaceBuilder {
    /// Walks `path`'s static segments down from `root`, reusing existing
    /// nodes, and installs one callable per operation on the final node.
    ///
    /// ## Errors
    ///
    /// Propagates [`Path::operations`] errors.
    pub fn build<'a>(
        path: &Arc<Path>,
        root: &'a mut Namespace,
        configuration: &Arc<Configuration>,
    ) -> Result<&'a mut Namespace, SchemaError> {
        let operations = path.operations()?;

        let node = path
            .non_parameter_elements()
            .iter()
            .fold(root, |node, segment| node.child_mut(constant_identifier(segment)));

        for operation in operations {
            node.install(GeneratedOperation::new(
                Arc::clone(operation),
                Arc::clone(path),
                Arc::clone(configuration),
            ));
        }

        Ok(node)
    }
}

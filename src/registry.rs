//! Model registry for named schema storage and whole-tree operations.
//!
//! This module provides the [`ModelRegistry`] type that stores named models
//! (a schema tree and the record layout of its root) and runs validation,
//! unmarshaling and leafref resolution against them by name.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::data::{Record, RecordType};
use crate::leafref::{resolve_leafrefs, LeafrefOptions};
use crate::schema::SchemaTree;
use crate::unmarshal::{unmarshal, Payload, UnmarshalOptions};
use crate::validate::validate_record;
use crate::ValidationResult;
use stillwater::Validation;

/// Type alias for the model storage map.
type ModelMap = Arc<RwLock<HashMap<String, Arc<Model>>>>;

/// A schema tree and the layout of the record its root maps to.
#[derive(Debug)]
pub struct Model {
    tree: SchemaTree,
    root_type: Arc<RecordType>,
}

impl Model {
    pub fn new(tree: SchemaTree, root_type: Arc<RecordType>) -> Self {
        Self { tree, root_type }
    }

    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    pub fn root_type(&self) -> &Arc<RecordType> {
        &self.root_type
    }

    /// Creates an empty root record.
    pub fn new_record(&self) -> Record {
        Record::new(Arc::clone(&self.root_type))
    }
}

/// A thread-safe registry of named models.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Models are immutable once registered, so a looked-up model can be used
/// without holding the lock.
///
/// # Example
///
/// ```rust
/// use yangtree::{Entry, ModelRegistry, RecordType, SchemaTree, TypeKind, YangType};
/// use serde_json::json;
///
/// let registry = ModelRegistry::new();
/// let tree = SchemaTree::new(
///     Entry::container("system").child(Entry::leaf("mtu", YangType::new(TypeKind::Uint16))),
/// )
/// .unwrap();
/// let ty = RecordType::builder("System").leaf("Mtu", "mtu").build();
/// registry.register("system", tree, ty).unwrap();
///
/// let record = registry.unmarshal_json("system", &json!({"mtu": 1500}), &Default::default()).unwrap();
/// let record = record.into_result().unwrap();
/// assert!(registry.validate("system", &record).unwrap().is_success());
/// ```
pub struct ModelRegistry {
    models: ModelMap,
    leafref_options: LeafrefOptions,
}

impl ModelRegistry {
    /// Creates a new empty registry. Leafrefs to missing data are errors.
    pub fn new() -> Self {
        Self {
            models: Arc::new(RwLock::new(HashMap::new())),
            leafref_options: LeafrefOptions::default(),
        }
    }

    /// Sets the options used by [`ModelRegistry::resolve_leafrefs`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use yangtree::{LeafrefOptions, ModelRegistry};
    ///
    /// let registry = ModelRegistry::new()
    ///     .with_leafref_options(LeafrefOptions::new().ignore_missing_data());
    /// ```
    pub fn with_leafref_options(mut self, options: LeafrefOptions) -> Self {
        self.leafref_options = options;
        self
    }

    /// Registers a model with the given name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register(
        &self,
        name: impl Into<String>,
        tree: SchemaTree,
        root_type: Arc<RecordType>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut models = self.models.write();

        if models.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(model = %name, root = %tree.root().name(), "register model");
        models.insert(name, Arc::new(Model::new(tree, root_type)));
        Ok(())
    }

    /// Retrieves a model by name.
    pub fn get(&self, name: &str) -> Option<Arc<Model>> {
        self.models.read().get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.models.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn model(&self, name: &str) -> Result<Arc<Model>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::ModelNotFound(name.to_string()))
    }

    /// Validates a root record against a named model.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ModelNotFound` if the name doesn't exist.
    pub fn validate(&self, name: &str, record: &Record) -> Result<ValidationResult<()>, RegistryError> {
        let model = self.model(name)?;
        Ok(validate_record(model.tree.root(), record))
    }

    /// Builds a new root record of a named model from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ModelNotFound` if the name doesn't exist.
    pub fn unmarshal_json(
        &self,
        name: &str,
        value: &Value,
        options: &UnmarshalOptions,
    ) -> Result<ValidationResult<Record>, RegistryError> {
        let model = self.model(name)?;
        let mut record = model.new_record();
        let result = unmarshal(model.tree.root(), &mut record, Payload::Json(value), options);
        Ok(match result {
            Validation::Success(()) => Validation::Success(record),
            Validation::Failure(errors) => Validation::Failure(errors),
        })
    }

    /// Checks the leafrefs of a root record of a named model.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ModelNotFound` if the name doesn't exist.
    pub fn resolve_leafrefs(&self, name: &str, record: &Record) -> Result<ValidationResult<()>, RegistryError> {
        let model = self.model(name)?;
        Ok(resolve_leafrefs(model.tree.root(), record, &self.leafref_options))
    }

    /// Validates independent root records in parallel. Results are in input
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ModelNotFound` if the name doesn't exist.
    pub fn validate_batch(
        &self,
        name: &str,
        records: &[Record],
    ) -> Result<Vec<ValidationResult<()>>, RegistryError> {
        let model = self.model(name)?;
        let root = model.tree.root();
        Ok(records
            .par_iter()
            .map(|record| validate_record(root, record))
            .collect())
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ModelRegistry {
    fn clone(&self) -> Self {
        Self {
            models: Arc::clone(&self.models),
            leafref_options: self.leafref_options,
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a model with a name that already exists.
    #[error("model '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to use a model name that doesn't exist.
    #[error("model '{0}' not found")]
    ModelNotFound(String),
}

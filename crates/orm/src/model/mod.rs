//! Model - one table row held in memory
//!
//! A `MysqlModel` owns an ordered attribute map plus the configuration of the
//! table it maps onto. CRUD operations live in `crud_operations`; this module
//! covers construction, attribute access and change notification.

pub mod config;
pub mod crud_operations;
pub mod primary_key;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use config::{CollectionConfig, ModelConfig, UpsertEscaping, DEFAULT_PRIMARY_KEY};
pub use primary_key::PrimaryKey;

use crate::error::ModelResult;
use crate::events::ModelObserver;
use crate::observers::ObserverRegistry;

/// Attribute map of one row, in column order
pub type Attributes = serde_json::Map<String, Value>;

/// Attribute holding the instance id, independent of the primary key name
pub const ID_ATTRIBUTE: &str = "id";

/// In-memory representation of one table row
#[derive(Clone)]
pub struct MysqlModel {
    config: ModelConfig,
    attributes: Attributes,
    observers: ObserverRegistry<dyn ModelObserver>,
}

impl MysqlModel {
    /// Empty model bound to `config`
    pub fn new(config: ModelConfig) -> Self {
        Self::with_attributes(config, Attributes::new())
    }

    /// Model bound to `config` with initial attributes (no notification)
    pub fn with_attributes(config: ModelConfig, attributes: Attributes) -> Self {
        Self {
            config,
            attributes,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    pub fn primary_key_name(&self) -> &str {
        &self.config.primary_key
    }

    /// Register an observer for attribute changes
    pub fn observe(&mut self, observer: Arc<dyn ModelObserver>) {
        self.observers.register(observer);
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Whether `key` holds a non-null value
    pub fn has(&self, key: &str) -> bool {
        self.attributes.get(key).map_or(false, |v| !v.is_null())
    }

    /// Instance id: the `id` attribute when it holds a usable key
    pub fn id(&self) -> Option<PrimaryKey> {
        self.attributes.get(ID_ATTRIBUTE).and_then(PrimaryKey::from_json)
    }

    /// Resolve the key addressing this row: the explicit argument, else the
    /// instance id, else the attribute under the primary key name
    pub fn effective_id(&self, explicit: Option<PrimaryKey>) -> Option<PrimaryKey> {
        explicit
            .filter(PrimaryKey::is_valid)
            .or_else(|| self.id())
            .or_else(|| {
                self.attributes
                    .get(&self.config.primary_key)
                    .and_then(PrimaryKey::from_json)
            })
    }

    /// Set one attribute
    pub async fn set(&mut self, key: &str, value: Value) -> ModelResult<()> {
        let mut changes = Attributes::new();
        changes.insert(key.to_string(), value);
        self.set_attributes(changes).await
    }

    /// Merge `changes` into the attributes, notifying observers of the keys
    /// whose value actually changed
    pub async fn set_attributes(&mut self, changes: Attributes) -> ModelResult<()> {
        let mut changed = Vec::new();
        for (key, value) in changes {
            if self.attributes.get(&key) != Some(&value) {
                changed.push(key.clone());
            }
            self.attributes.insert(key, value);
        }
        self.notify_changed(&changed).await
    }

    /// Replace the whole attribute set
    pub async fn replace_attributes(&mut self, attributes: Attributes) -> ModelResult<()> {
        let mut changed: Vec<String> = attributes
            .iter()
            .filter(|(key, value)| self.attributes.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        changed.extend(
            self.attributes
                .keys()
                .filter(|key| !attributes.contains_key(*key))
                .cloned(),
        );

        self.attributes = attributes;
        self.notify_changed(&changed).await
    }

    /// Remove one attribute
    pub async fn unset(&mut self, key: &str) -> ModelResult<Option<Value>> {
        let removed = self.attributes.remove(key);
        if removed.is_some() {
            self.notify_changed(&[key.to_string()]).await?;
        }
        Ok(removed)
    }

    /// Remove every attribute
    pub async fn clear(&mut self) -> ModelResult<()> {
        let previous = std::mem::take(&mut self.attributes);
        self.observers.trigger_cleared(&previous).await?;
        Ok(())
    }

    /// Attributes as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(self.attributes.clone())
    }

    async fn notify_changed(&self, changed: &[String]) -> ModelResult<()> {
        if !changed.is_empty() {
            self.observers
                .trigger_changed(&self.attributes, changed)
                .await?;
        }
        Ok(())
    }
}

impl fmt::Debug for MysqlModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlModel")
            .field("table_name", &self.config.table_name)
            .field("attributes", &self.attributes)
            .field("observers", &self.observers)
            .finish()
    }
}

impl PartialEq for MysqlModel {
    fn eq(&self, other: &Self) -> bool {
        self.config.table_name == other.config.table_name && self.attributes == other.attributes
    }
}

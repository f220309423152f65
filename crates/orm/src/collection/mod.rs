//! Collection - a set of rows of one table held in memory
//!
//! `MysqlCollection` keeps an ordered member list of `MysqlModel`s, unique by
//! primary key value. Batch operations live in `operations`; this module
//! covers configuration and membership bookkeeping.

pub mod destroy;
pub mod operations;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use destroy::DestroyTarget;

use crate::backends::Row;
use crate::error::ModelResult;
use crate::events::CollectionObserver;
use crate::model::{
    Attributes, CollectionConfig, ModelConfig, MysqlModel, PrimaryKey, UpsertEscaping, ID_ATTRIBUTE,
};
use crate::observers::ObserverRegistry;

/// In-memory representation of a set of rows
pub struct MysqlCollection {
    model_config: ModelConfig,
    overrides: CollectionConfig,
    resolved: ModelConfig,
    models: Vec<MysqlModel>,
    observers: ObserverRegistry<dyn CollectionObserver>,
}

impl MysqlCollection {
    /// Empty collection using the model's configuration as-is
    pub fn new(model_config: ModelConfig) -> Self {
        Self::with_config(model_config, CollectionConfig::default())
    }

    /// Empty collection with collection level overrides
    pub fn with_config(model_config: ModelConfig, overrides: CollectionConfig) -> Self {
        let resolved = overrides.resolve(&model_config);
        Self {
            model_config,
            overrides,
            resolved,
            models: Vec::new(),
            observers: ObserverRegistry::new(),
        }
    }

    /// Configuration of the paired model type
    pub fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    /// Effective configuration after resolving overrides
    pub fn config(&self) -> &ModelConfig {
        &self.resolved
    }

    pub fn table_name(&self) -> &str {
        &self.resolved.table_name
    }

    pub fn primary_key_name(&self) -> &str {
        &self.resolved.primary_key
    }

    pub fn upsert_escaping(&self) -> UpsertEscaping {
        self.overrides.upsert_escaping
    }

    /// Register an observer for membership changes
    pub fn observe(&mut self, observer: Arc<dyn CollectionObserver>) {
        self.observers.register(observer);
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> &[MysqlModel] {
        &self.models
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MysqlModel> {
        self.models.iter()
    }

    pub fn get(&self, id: &PrimaryKey) -> Option<&MysqlModel> {
        self.position(id).map(|index| &self.models[index])
    }

    pub fn get_mut(&mut self, id: &PrimaryKey) -> Option<&mut MysqlModel> {
        self.position(id).map(move |index| &mut self.models[index])
    }

    pub fn contains(&self, id: &PrimaryKey) -> bool {
        self.position(id).is_some()
    }

    /// Keys of all members that have one, in member order
    pub fn ids(&self) -> Vec<PrimaryKey> {
        self.models
            .iter()
            .filter_map(|model| model.effective_id(None))
            .collect()
    }

    /// Members as a JSON array of attribute objects
    pub fn to_json(&self) -> Value {
        Value::Array(self.models.iter().map(MysqlModel::to_json).collect())
    }

    /// New model bound to this collection's effective configuration
    pub fn new_model(&self, attributes: Attributes) -> MysqlModel {
        MysqlModel::with_attributes(self.resolved.clone(), attributes)
    }

    /// Add a row as a member, merging into the existing member with the same
    /// key if there is one
    pub async fn add(&mut self, attributes: Attributes) -> ModelResult<()> {
        let existing = self
            .key_of(&attributes)
            .and_then(|id| self.position(&id));

        match existing {
            Some(index) => self.models[index].set_attributes(attributes).await,
            None => {
                let model = self.new_model(attributes);
                self.observers.trigger_added(model.attributes()).await?;
                self.models.push(model);
                Ok(())
            }
        }
    }

    /// Add an existing model instance, replacing any member with the same key
    pub async fn add_model(&mut self, model: MysqlModel) -> ModelResult<()> {
        if let Some(index) = model.effective_id(None).and_then(|id| self.position(&id)) {
            self.models[index] = model;
            return Ok(());
        }
        self.observers.trigger_added(model.attributes()).await?;
        self.models.push(model);
        Ok(())
    }

    /// Remove the members with the given keys, returning them
    pub async fn remove(&mut self, ids: &[PrimaryKey]) -> ModelResult<Vec<MysqlModel>> {
        let (removed, kept): (Vec<MysqlModel>, Vec<MysqlModel>) = std::mem::take(&mut self.models)
            .into_iter()
            .partition(|model| model.effective_id(None).map_or(false, |id| ids.contains(&id)));
        self.models = kept;

        for model in &removed {
            self.observers.trigger_removed(model.attributes()).await?;
        }
        Ok(removed)
    }

    /// Make the member set match `rows`: members with a matching key are
    /// merged and kept, new rows are added, members absent from `rows` are
    /// removed. Member order follows `rows`.
    pub async fn set(&mut self, rows: Vec<Row>) -> ModelResult<()> {
        let mut previous = std::mem::take(&mut self.models);
        let mut next: Vec<MysqlModel> = Vec::with_capacity(rows.len());
        let mut added = Vec::new();

        for row in rows {
            let id = self.key_of(&row);

            if let Some(id) = &id {
                if let Some(index) = next.iter().position(|m| m.effective_id(None).as_ref() == Some(id)) {
                    next[index].set_attributes(row).await?;
                    continue;
                }
                if let Some(index) = previous.iter().position(|m| m.effective_id(None).as_ref() == Some(id)) {
                    let mut model = previous.remove(index);
                    model.set_attributes(row).await?;
                    next.push(model);
                    continue;
                }
            }

            let model = self.new_model(row);
            added.push(next.len());
            next.push(model);
        }

        self.models = next;

        for model in &previous {
            self.observers.trigger_removed(model.attributes()).await?;
        }
        for index in added {
            self.observers.trigger_added(self.models[index].attributes()).await?;
        }
        Ok(())
    }

    /// Drop every member and add `rows` as fresh members
    pub async fn reset(&mut self, rows: Vec<Row>) -> ModelResult<()> {
        let previous = std::mem::take(&mut self.models);
        for model in &previous {
            self.observers.trigger_removed(model.attributes()).await?;
        }
        for row in rows {
            self.add(row).await?;
        }
        Ok(())
    }

    /// Key a row would have as a member
    fn key_of(&self, attributes: &Attributes) -> Option<PrimaryKey> {
        attributes
            .get(ID_ATTRIBUTE)
            .and_then(PrimaryKey::from_json)
            .or_else(|| {
                attributes
                    .get(&self.resolved.primary_key)
                    .and_then(PrimaryKey::from_json)
            })
    }

    fn position(&self, id: &PrimaryKey) -> Option<usize> {
        self.models
            .iter()
            .position(|model| model.effective_id(None).as_ref() == Some(id))
    }
}

impl fmt::Debug for MysqlCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlCollection")
            .field("config", &self.resolved)
            .field("models", &self.models)
            .finish()
    }
}

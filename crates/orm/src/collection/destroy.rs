//! Input of `MysqlCollection::destroy`

use crate::error::{ModelError, ModelResult};
use crate::model::{MysqlModel, PrimaryKey};

/// What a collection destroy should remove
#[derive(Debug, Clone)]
pub enum DestroyTarget {
    /// One row by key, through a throwaway model
    ByIdentifier(PrimaryKey),
    /// One model instance, through its own `destroy`
    ByInstance(MysqlModel),
    /// Several rows in one batched DELETE
    ByIdentifierList(Vec<PrimaryKey>),
}

impl DestroyTarget {
    /// Batch target built from model instances; every model needs a key
    pub fn from_models<'a, I>(models: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = &'a MysqlModel>,
    {
        let ids = models
            .into_iter()
            .map(|model| {
                model.effective_id(None).ok_or_else(|| {
                    ModelError::InvalidArgument("every model needs an id.".to_string())
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(DestroyTarget::ByIdentifierList(ids))
    }
}

impl From<PrimaryKey> for DestroyTarget {
    fn from(id: PrimaryKey) -> Self {
        DestroyTarget::ByIdentifier(id)
    }
}

impl From<MysqlModel> for DestroyTarget {
    fn from(model: MysqlModel) -> Self {
        DestroyTarget::ByInstance(model)
    }
}

impl From<Vec<PrimaryKey>> for DestroyTarget {
    fn from(ids: Vec<PrimaryKey>) -> Self {
        DestroyTarget::ByIdentifierList(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attributes, ModelConfig};
    use serde_json::json;

    fn model_with(id: Option<i64>) -> MysqlModel {
        let mut attributes = Attributes::new();
        if let Some(id) = id {
            attributes.insert("id".to_string(), json!(id));
        }
        attributes.insert("name".to_string(), json!("n"));
        MysqlModel::with_attributes(ModelConfig::new("users"), attributes)
    }

    #[test]
    fn test_from_models_collects_ids() {
        let models = vec![model_with(Some(1)), model_with(Some(2))];
        match DestroyTarget::from_models(&models).unwrap() {
            DestroyTarget::ByIdentifierList(ids) => {
                assert_eq!(ids, vec![PrimaryKey::Integer(1), PrimaryKey::Integer(2)])
            }
            other => panic!("Expected identifier list, got {:?}", other),
        }
    }

    #[test]
    fn test_from_models_rejects_missing_id() {
        let models = vec![model_with(Some(1)), model_with(None)];
        assert!(matches!(
            DestroyTarget::from_models(&models),
            Err(ModelError::InvalidArgument(_))
        ));
    }
}

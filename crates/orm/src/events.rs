//! Change notifications for models and collections
//!
//! Successful operations mutate attributes and membership in place; observers
//! registered on the instance are told about each mutation after it happened.

use async_trait::async_trait;

use crate::error::EventError;
use crate::model::Attributes;

/// Observer of one model's attribute state
#[async_trait]
pub trait ModelObserver: Send + Sync {
    /// Attributes were set; `changed` lists the keys whose value differs
    async fn changed(&self, _attributes: &Attributes, _changed: &[String]) -> Result<(), EventError> {
        Ok(())
    }

    /// All attributes were cleared; `previous` holds what was removed
    async fn cleared(&self, _previous: &Attributes) -> Result<(), EventError> {
        Ok(())
    }
}

/// Observer of a collection's member set
#[async_trait]
pub trait CollectionObserver: Send + Sync {
    async fn added(&self, _attributes: &Attributes) -> Result<(), EventError> {
        Ok(())
    }

    async fn removed(&self, _attributes: &Attributes) -> Result<(), EventError> {
        Ok(())
    }
}

use std::fmt;
use std::sync::Arc;

use crate::error::EventError;
use crate::events::{CollectionObserver, ModelObserver};
use crate::model::Attributes;

/// Ordered list of observers; cloning shares the observers
pub struct ObserverRegistry<O: ?Sized> {
    observers: Vec<Arc<O>>,
}

impl<O: ?Sized> ObserverRegistry<O> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn register(&mut self, observer: Arc<O>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl<O: ?Sized> Default for ObserverRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized> Clone for ObserverRegistry<O> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<O: ?Sized> fmt::Debug for ObserverRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ObserverRegistry<dyn ModelObserver> {
    pub async fn trigger_changed(&self, attributes: &Attributes, changed: &[String]) -> Result<(), EventError> {
        for observer in &self.observers {
            observer.changed(attributes, changed).await?;
        }
        Ok(())
    }

    pub async fn trigger_cleared(&self, previous: &Attributes) -> Result<(), EventError> {
        for observer in &self.observers {
            observer.cleared(previous).await?;
        }
        Ok(())
    }
}

impl ObserverRegistry<dyn CollectionObserver> {
    pub async fn trigger_added(&self, attributes: &Attributes) -> Result<(), EventError> {
        for observer in &self.observers {
            observer.added(attributes).await?;
        }
        Ok(())
    }

    pub async fn trigger_removed(&self, attributes: &Attributes) -> Result<(), EventError> {
        for observer in &self.observers {
            observer.removed(attributes).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ModelObserver for Recorder {
        async fn changed(&self, _attributes: &Attributes, changed: &[String]) -> Result<(), EventError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}: {}", self.name, changed.join(",")));
            Ok(())
        }
    }

    struct Rejecting;

    #[async_trait]
    impl ModelObserver for Rejecting {
        async fn changed(&self, _attributes: &Attributes, _changed: &[String]) -> Result<(), EventError> {
            Err(EventError::propagation_stopped("read only"))
        }
    }

    #[tokio::test]
    async fn test_observers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry: ObserverRegistry<dyn ModelObserver> = ObserverRegistry::new();
        registry.register(Arc::new(Recorder { name: "first", log: log.clone() }));
        registry.register(Arc::new(Recorder { name: "second", log: log.clone() }));

        registry
            .trigger_changed(&Attributes::new(), &["id".to_string()])
            .await
            .unwrap();

        assert_eq!(registry.observer_count(), 2);
        assert_eq!(log.lock().unwrap().as_slice(), &["first: id", "second: id"]);
    }

    #[tokio::test]
    async fn test_failure_stops_propagation() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry: ObserverRegistry<dyn ModelObserver> = ObserverRegistry::new();
        registry.register(Arc::new(Rejecting));
        registry.register(Arc::new(Recorder { name: "late", log: log.clone() }));

        let err = registry.trigger_changed(&Attributes::new(), &[]).await.unwrap_err();

        assert!(matches!(err, EventError::PropagationStopped { .. }));
        assert!(log.lock().unwrap().is_empty());
    }
}

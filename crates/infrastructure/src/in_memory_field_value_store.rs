use std::collections::HashMap;

use async_trait::async_trait;
use fieldgate_application::FieldValueStore;
use fieldgate_core::{AppResult, EntityId, SiteId};
use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory field value store implementation.
#[derive(Debug, Default)]
pub struct InMemoryFieldValueStore {
    values: RwLock<HashMap<(SiteId, String, String), Value>>,
}

impl InMemoryFieldValueStore {
    /// Creates an empty value store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FieldValueStore for InMemoryFieldValueStore {
    async fn get_field_value(
        &self,
        site_id: SiteId,
        field_name: &str,
        entity_id: &EntityId,
    ) -> AppResult<Option<Value>> {
        let key = (site_id, entity_id.as_str().to_owned(), field_name.to_owned());
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn save_field_value(
        &self,
        site_id: SiteId,
        field_name: &str,
        entity_id: &EntityId,
        value: Value,
    ) -> AppResult<()> {
        let key = (site_id, entity_id.as_str().to_owned(), field_name.to_owned());
        self.values.write().await.insert(key, value);
        Ok(())
    }
}

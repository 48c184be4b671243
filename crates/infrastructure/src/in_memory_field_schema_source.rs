use std::collections::HashMap;

use async_trait::async_trait;
use fieldgate_application::FieldSchemaSource;
use fieldgate_core::{AppResult, SiteId};
use fieldgate_domain::FieldGroup;
use tokio::sync::RwLock;

/// In-memory store of published field groups.
#[derive(Debug, Default)]
pub struct InMemoryFieldSchemaSource {
    groups: RwLock<HashMap<SiteId, Vec<FieldGroup>>>,
}

impl InMemoryFieldSchemaSource {
    /// Creates an empty schema source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FieldSchemaSource for InMemoryFieldSchemaSource {
    async fn list_field_groups(&self, site_id: SiteId) -> AppResult<Vec<FieldGroup>> {
        Ok(self
            .groups
            .read()
            .await
            .get(&site_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_field_groups(&self, site_id: SiteId, groups: Vec<FieldGroup>) -> AppResult<()> {
        self.groups.write().await.insert(site_id, groups);
        Ok(())
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use fieldgate_application::GrantTableRepository;
use fieldgate_core::{AppResult, SiteId};
use fieldgate_domain::GrantTable;
use tokio::sync::RwLock;

/// In-memory grant table repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryGrantTableRepository {
    tables: RwLock<HashMap<SiteId, GrantTable>>,
}

impl InMemoryGrantTableRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GrantTableRepository for InMemoryGrantTableRepository {
    async fn load_grant_table(&self, site_id: SiteId) -> AppResult<GrantTable> {
        Ok(self
            .tables
            .read()
            .await
            .get(&site_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_grant_table(&self, site_id: SiteId, table: GrantTable) -> AppResult<()> {
        self.tables.write().await.insert(site_id, table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_application::GrantTableRepository;
    use fieldgate_core::SiteId;
    use fieldgate_domain::GrantTable;

    use super::InMemoryGrantTableRepository;

    #[tokio::test]
    async fn replace_swaps_the_whole_table() {
        let repository = InMemoryGrantTableRepository::new();
        let site_id = SiteId::new(1).unwrap_or_else(|_| unreachable!());

        let mut first = GrantTable::new();
        assert!(first.set_grant("field_a", "corporate", true).is_ok());
        assert!(repository.replace_grant_table(site_id, first).await.is_ok());

        let mut second = GrantTable::new();
        assert!(second.set_grant("field_b", "franchisee", true).is_ok());
        assert!(repository.replace_grant_table(site_id, second.clone()).await.is_ok());

        let loaded = repository
            .load_grant_table(site_id)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn unknown_site_loads_empty_table() {
        let repository = InMemoryGrantTableRepository::new();
        let site_id = SiteId::new(2).unwrap_or_else(|_| unreachable!());

        let loaded = repository
            .load_grant_table(site_id)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(loaded.controlled_field_count(), 0);
    }
}

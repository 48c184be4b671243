use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use fieldgate_application::RoleRepository;
use fieldgate_core::{AppError, AppResult, SiteId};
use fieldgate_domain::RoleDefinition;
use tokio::sync::RwLock;

/// In-memory role repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<SiteId, BTreeMap<String, RoleDefinition>>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_role(&self, site_id: SiteId, name: &str) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&site_id)
            .and_then(|roles| roles.get(name))
            .cloned())
    }

    async fn list_roles(&self, site_id: SiteId) -> AppResult<Vec<RoleDefinition>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&site_id)
            .map(|roles| roles.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_role(&self, site_id: SiteId, role: RoleDefinition) -> AppResult<bool> {
        let mut roles = self.roles.write().await;
        let site_roles = roles.entry(site_id).or_default();

        if site_roles.contains_key(role.name()) {
            return Ok(false);
        }

        site_roles.insert(role.name().to_owned(), role);
        Ok(true)
    }

    async fn add_capabilities(
        &self,
        site_id: SiteId,
        name: &str,
        capabilities: &[String],
    ) -> AppResult<usize> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(&site_id)
            .and_then(|roles| roles.get_mut(name))
            .ok_or_else(|| {
                AppError::NotFound(format!("role '{name}' does not exist on site '{site_id}'"))
            })?;

        Ok(role.add_capabilities(capabilities.iter().cloned()))
    }
}

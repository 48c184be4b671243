use async_trait::async_trait;
use fieldgate_core::{AppResult, SiteId};
use fieldgate_domain::RoleDefinition;

/// Repository port for site roles.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Finds a role by name.
    async fn find_role(&self, site_id: SiteId, name: &str) -> AppResult<Option<RoleDefinition>>;

    /// Lists every role of a site ordered by name.
    async fn list_roles(&self, site_id: SiteId) -> AppResult<Vec<RoleDefinition>>;

    /// Creates a role unless one with the same name exists.
    ///
    /// Returns `true` when the role was created.
    async fn create_role(&self, site_id: SiteId, role: RoleDefinition) -> AppResult<bool>;

    /// Adds capabilities to an existing role and returns how many were new.
    async fn add_capabilities(
        &self,
        site_id: SiteId,
        name: &str,
        capabilities: &[String],
    ) -> AppResult<usize>;
}

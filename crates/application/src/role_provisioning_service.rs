use std::sync::Arc;

use fieldgate_core::{AppError, AppResult, SiteId, UserIdentity};
use fieldgate_domain::{
    ADMINISTRATOR_ROLE, AccessGate, CustomRole, DASHBOARD_CAPABILITIES, EDITOR_ROLE,
    RoleDefinition,
};
use tracing::info;

use crate::RoleRepository;


/// Outcome of one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProvisioningReport {
    /// Custom roles created by this run.
    pub created_roles: Vec<String>,
    /// Dashboard capabilities newly attached across all custom roles.
    pub added_capabilities: usize,
    /// Custom roles as stored after the run.
    pub roles: Vec<RoleDefinition>,
}

/// Application service creating and listing the custom roles of a site.
#[derive(Clone)]
pub struct RoleProvisioningService {
    repository: Arc<dyn RoleRepository>,
    gate: AccessGate,
}

impl RoleProvisioningService {
    /// Creates a new role provisioning service.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>, gate: AccessGate) -> Self {
        Self { repository, gate }
    }

    /// Creates missing custom roles and attaches the dashboard capabilities.
    ///
    /// Existing roles are never overwritten, so running this twice is safe.
    pub async fn provision_custom_roles(
        &self,
        user: &UserIdentity,
    ) -> AppResult<RoleProvisioningReport> {
        if !self.gate.is_administrator(user) {
            return Err(AppError::Forbidden(format!(
                "subject '{}' may not provision roles on site '{}'",
                user.subject(),
                user.site_id()
            )));
        }

        let site_id = user.site_id();
        let dashboard_capabilities: Vec<String> = DASHBOARD_CAPABILITIES
            .iter()
            .map(|capability| (*capability).to_owned())
            .collect();

        let mut created_roles = Vec::new();
        let mut added_capabilities = 0;
        let mut roles = Vec::with_capacity(CustomRole::all().len());

        for role in CustomRole::all() {
            if self.repository.find_role(site_id, role.as_str()).await?.is_none() {
                let base = self.base_role(site_id, role.base_role()).await?;
                let definition = role.definition_from(&base)?;
                if self.repository.create_role(site_id, definition).await? {
                    created_roles.push(role.as_str().to_owned());
                }
            }

            added_capabilities += self
                .repository
                .add_capabilities(site_id, role.as_str(), &dashboard_capabilities)
                .await?;

            let stored = self
                .repository
                .find_role(site_id, role.as_str())
                .await?
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "role '{}' is missing right after provisioning",
                        role.as_str()
                    ))
                })?;
            roles.push(stored);
        }

        info!(
            site_id = %site_id,
            subject = user.subject(),
            created = created_roles.len(),
            added_capabilities,
            "provisioned custom roles"
        );

        Ok(RoleProvisioningReport {
            created_roles,
            added_capabilities,
            roles,
        })
    }

    /// Lists every role of the acting user's site.
    pub async fn list_roles(&self, user: &UserIdentity) -> AppResult<Vec<RoleDefinition>> {
        if !self.gate.can_manage_settings(user) {
            return Err(AppError::Forbidden(format!(
                "subject '{}' may not list roles on site '{}'",
                user.subject(),
                user.site_id()
            )));
        }

        self.repository.list_roles(user.site_id()).await
    }

    async fn base_role(&self, site_id: SiteId, name: &str) -> AppResult<RoleDefinition> {
        if let Some(role) = self.repository.find_role(site_id, name).await? {
            return Ok(role);
        }

        match name {
            ADMINISTRATOR_ROLE => RoleDefinition::builtin_administrator(),
            EDITOR_ROLE => RoleDefinition::builtin_editor(),
            _ => Err(AppError::NotFound(format!(
                "base role '{name}' does not exist on site '{site_id}'"
            ))),
        }
    }
}

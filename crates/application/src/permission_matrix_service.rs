use std::collections::BTreeSet;
use std::sync::Arc;

use fieldgate_core::{AppError, AppResult, UserIdentity};
use fieldgate_domain::{AccessGate, CustomRole, FieldGroup, GrantTable, PermissionMatrix};
use tracing::info;

use crate::{FieldSchemaSource, GrantTableRepository};

#[cfg(test)]
mod tests;

/// Application service behind the permission settings page.
#[derive(Clone)]
pub struct PermissionMatrixService {
    grant_repository: Arc<dyn GrantTableRepository>,
    schema_source: Arc<dyn FieldSchemaSource>,
    gate: AccessGate,
    matrix_roles: Vec<String>,
}

impl PermissionMatrixService {
    /// Creates a service with the default matrix role columns.
    #[must_use]
    pub fn new(
        grant_repository: Arc<dyn GrantTableRepository>,
        schema_source: Arc<dyn FieldSchemaSource>,
        gate: AccessGate,
    ) -> Self {
        Self {
            grant_repository,
            schema_source,
            gate,
            matrix_roles: CustomRole::matrix_defaults()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        }
    }

    /// Overrides the role columns shown in the matrix.
    pub fn with_matrix_roles<I, S>(mut self, roles: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let roles: Vec<String> = roles
            .into_iter()
            .map(Into::into)
            .map(|role| role.trim().to_owned())
            .filter(|role| !role.is_empty() && seen.insert(role.clone()))
            .collect();

        if roles.is_empty() {
            return Err(AppError::Validation(
                "permission matrix needs at least one role column".to_owned(),
            ));
        }

        self.matrix_roles = roles;
        Ok(self)
    }

    /// Returns the matrix role columns.
    #[must_use]
    pub fn matrix_roles(&self) -> &[String] {
        &self.matrix_roles
    }

    /// Builds the settings page matrix for the site of the acting user.
    pub async fn permission_matrix(&self, user: &UserIdentity) -> AppResult<PermissionMatrix> {
        self.require_settings_access(user)?;

        let site_id = user.site_id();
        let groups = self.schema_source.list_field_groups(site_id).await?;
        let grants = self.grant_repository.load_grant_table(site_id).await?;

        Ok(PermissionMatrix::build(&groups, &self.matrix_roles, &grants))
    }

    /// Replaces the grant table from submitted settings form pairs.
    pub async fn save_permissions<I, K, V>(
        &self,
        user: &UserIdentity,
        pairs: I,
    ) -> AppResult<GrantTable>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.require_settings_access(user)?;

        let table = GrantTable::from_form_pairs(pairs)?;
        self.grant_repository
            .replace_grant_table(user.site_id(), table.clone())
            .await?;

        info!(
            site_id = %user.site_id(),
            subject = user.subject(),
            controlled_fields = table.controlled_field_count(),
            "replaced field grant table"
        );

        Ok(table)
    }

    /// Stores the field groups the host currently registers.
    pub async fn publish_field_groups(
        &self,
        user: &UserIdentity,
        groups: Vec<FieldGroup>,
    ) -> AppResult<usize> {
        self.require_settings_access(user)?;

        let mut keys = BTreeSet::new();
        if let Some(duplicate) = groups.iter().find(|group| !keys.insert(group.key())) {
            return Err(AppError::Conflict(format!(
                "field group '{}' is published more than once",
                duplicate.key()
            )));
        }

        let count = groups.len();
        self.schema_source
            .save_field_groups(user.site_id(), groups)
            .await?;

        info!(
            site_id = %user.site_id(),
            field_groups = count,
            "published field groups"
        );

        Ok(count)
    }

    fn require_settings_access(&self, user: &UserIdentity) -> AppResult<()> {
        if self.gate.can_manage_settings(user) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' may not manage field permissions on site '{}'",
            user.subject(),
            user.site_id()
        )))
    }
}

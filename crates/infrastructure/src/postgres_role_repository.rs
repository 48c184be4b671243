use async_trait::async_trait;
use fieldgate_application::RoleRepository;
use fieldgate_core::{AppError, AppResult, SiteId};
use fieldgate_domain::RoleDefinition;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::site_key::site_key;


/// PostgreSQL-backed site role repository.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    name: String,
    display_name: String,
    capabilities: Json<Vec<String>>,
}

impl RoleRow {
    fn into_definition(self) -> AppResult<RoleDefinition> {
        RoleDefinition::new(self.name, self.display_name, self.capabilities.0)
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_role(&self, site_id: SiteId, name: &str) -> AppResult<Option<RoleDefinition>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, display_name, capabilities
            FROM site_roles
            WHERE site_id = $1 AND name = $2
            "#,
        )
        .bind(site_key(site_id)?)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find role '{name}' for site '{site_id}': {error}"
            ))
        })?;

        row.map(RoleRow::into_definition).transpose()
    }

    async fn list_roles(&self, site_id: SiteId) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, display_name, capabilities
            FROM site_roles
            WHERE site_id = $1
            ORDER BY name
            "#,
        )
        .bind(site_key(site_id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list roles for site '{site_id}': {error}"))
        })?;

        rows.into_iter().map(RoleRow::into_definition).collect()
    }

    async fn create_role(&self, site_id: SiteId, role: RoleDefinition) -> AppResult<bool> {
        let capabilities: Vec<String> = role.capabilities().iter().cloned().collect();
        let result = sqlx::query(
            r#"
            INSERT INTO site_roles (site_id, name, display_name, capabilities)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (site_id, name) DO NOTHING
            "#,
        )
        .bind(site_key(site_id)?)
        .bind(role.name())
        .bind(role.display_name())
        .bind(Json(capabilities))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to create role '{}' for site '{site_id}': {error}",
                role.name()
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_capabilities(
        &self,
        site_id: SiteId,
        name: &str,
        capabilities: &[String],
    ) -> AppResult<usize> {
        let site = site_key(site_id)?;
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, display_name, capabilities
            FROM site_roles
            WHERE site_id = $1 AND name = $2
            FOR UPDATE
            "#,
        )
        .bind(site)
        .bind(name)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to lock role '{name}' for site '{site_id}': {error}"
            ))
        })?
        .ok_or_else(|| {
            AppError::NotFound(format!("role '{name}' does not exist on site '{site_id}'"))
        })?;

        let mut role = row.into_definition()?;
        let added = role.add_capabilities(capabilities.iter().cloned());

        if added > 0 {
            let merged: Vec<String> = role.capabilities().iter().cloned().collect();
            sqlx::query(
                r#"
                UPDATE site_roles
                SET capabilities = $3, updated_at = now()
                WHERE site_id = $1 AND name = $2
                "#,
            )
            .bind(site)
            .bind(name)
            .bind(Json(merged))
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to update capabilities of role '{name}': {error}"
                ))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit role capabilities: {error}"))
        })?;

        Ok(added)
    }
}

use async_trait::async_trait;
use fieldgate_application::FieldSchemaSource;
use fieldgate_core::{AppError, AppResult, SiteId};
use fieldgate_domain::FieldGroup;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use crate::site_key::site_key;

/// PostgreSQL-backed store of published field groups.
#[derive(Clone)]
pub struct PostgresFieldSchemaSource {
    pool: PgPool,
}

impl PostgresFieldSchemaSource {
    /// Creates a schema source with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldSchemaSource for PostgresFieldSchemaSource {
    async fn list_field_groups(&self, site_id: SiteId) -> AppResult<Vec<FieldGroup>> {
        let groups = sqlx::query_scalar::<_, Json<FieldGroup>>(
            r#"
            SELECT definition
            FROM field_groups
            WHERE site_id = $1
            ORDER BY position, group_key
            "#,
        )
        .bind(site_key(site_id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list field groups for site '{site_id}': {error}"
            ))
        })?;

        Ok(groups.into_iter().map(|Json(group)| group).collect())
    }

    async fn save_field_groups(&self, site_id: SiteId, groups: Vec<FieldGroup>) -> AppResult<()> {
        let site = site_key(site_id)?;
        let group_count = groups.len();
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        sqlx::query("DELETE FROM field_groups WHERE site_id = $1")
            .bind(site)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to clear field groups for site '{site_id}': {error}"
                ))
            })?;

        for (position, group) in groups.into_iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                AppError::Validation("too many field groups in one publish".to_owned())
            })?;
            let group_key = group.key().to_owned();

            sqlx::query(
                r#"
                INSERT INTO field_groups (site_id, group_key, position, definition, updated_at)
                VALUES ($1, $2, $3, $4, now())
                "#,
            )
            .bind(site)
            .bind(group_key.as_str())
            .bind(position)
            .bind(Json(group))
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to store field group '{group_key}' for site '{site_id}': {error}"
                ))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit field groups: {error}"))
        })?;

        debug!(site_id = %site_id, group_count, "stored published field groups");

        Ok(())
    }
}

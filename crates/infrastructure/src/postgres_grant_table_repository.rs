use async_trait::async_trait;
use fieldgate_application::GrantTableRepository;
use fieldgate_core::{AppError, AppResult, SiteId};
use fieldgate_domain::GrantTable;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::site_key::site_key;


const GRANT_TABLE_OPTION: &str = "field_permissions";

/// PostgreSQL-backed grant table repository.
///
/// The table lives in one `site_options` row so that replacing it is a single
/// upsert.
#[derive(Clone)]
pub struct PostgresGrantTableRepository {
    pool: PgPool,
}

impl PostgresGrantTableRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrantTableRepository for PostgresGrantTableRepository {
    async fn load_grant_table(&self, site_id: SiteId) -> AppResult<GrantTable> {
        let table = sqlx::query_scalar::<_, Json<GrantTable>>(
            r#"
            SELECT option_value
            FROM site_options
            WHERE site_id = $1 AND option_name = $2
            "#,
        )
        .bind(site_key(site_id)?)
        .bind(GRANT_TABLE_OPTION)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load grant table for site '{site_id}': {error}"
            ))
        })?;

        Ok(table.map(|Json(table)| table).unwrap_or_default())
    }

    async fn replace_grant_table(&self, site_id: SiteId, table: GrantTable) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO site_options (site_id, option_name, option_value, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (site_id, option_name)
            DO UPDATE SET
                option_value = EXCLUDED.option_value,
                updated_at = now()
            "#,
        )
        .bind(site_key(site_id)?)
        .bind(GRANT_TABLE_OPTION)
        .bind(Json(table))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to replace grant table for site '{site_id}': {error}"
            ))
        })?;

        Ok(())
    }
}

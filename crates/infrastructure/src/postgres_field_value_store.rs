use async_trait::async_trait;
use fieldgate_application::FieldValueStore;
use fieldgate_core::{AppError, AppResult, EntityId, SiteId};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::site_key::site_key;

/// PostgreSQL-backed field value store.
#[derive(Clone)]
pub struct PostgresFieldValueStore {
    pool: PgPool,
}

impl PostgresFieldValueStore {
    /// Creates a value store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldValueStore for PostgresFieldValueStore {
    async fn get_field_value(
        &self,
        site_id: SiteId,
        field_name: &str,
        entity_id: &EntityId,
    ) -> AppResult<Option<Value>> {
        let value = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            SELECT value
            FROM field_values
            WHERE site_id = $1 AND entity_id = $2 AND field_name = $3
            "#,
        )
        .bind(site_key(site_id)?)
        .bind(entity_id.as_str())
        .bind(field_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load value of '{field_name}' for entity '{entity_id}': {error}"
            ))
        })?;

        Ok(value.map(|Json(value)| value))
    }

    async fn save_field_value(
        &self,
        site_id: SiteId,
        field_name: &str,
        entity_id: &EntityId,
        value: Value,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO field_values (site_id, entity_id, field_name, value, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (site_id, entity_id, field_name)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = now()
            "#,
        )
        .bind(site_key(site_id)?)
        .bind(entity_id.as_str())
        .bind(field_name)
        .bind(Json(value))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save value of '{field_name}' for entity '{entity_id}': {error}"
            ))
        })?;

        Ok(())
    }
}

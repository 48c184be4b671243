use async_trait::async_trait;
use fieldgate_core::{AppResult, EntityId, SiteId};
use fieldgate_domain::{FieldGroup, GrantTable};
use serde_json::Value;

/// Repository port for the per-site grant table.
#[async_trait]
pub trait GrantTableRepository: Send + Sync {
    /// Loads the grant table, empty when the site never saved one.
    async fn load_grant_table(&self, site_id: SiteId) -> AppResult<GrantTable>;

    /// Replaces the whole grant table in one write.
    async fn replace_grant_table(&self, site_id: SiteId, table: GrantTable) -> AppResult<()>;
}

/// Port exposing the field groups registered by the host.
#[async_trait]
pub trait FieldSchemaSource: Send + Sync {
    /// Lists field groups in registration order.
    async fn list_field_groups(&self, site_id: SiteId) -> AppResult<Vec<FieldGroup>>;

    /// Replaces the published field groups of a site.
    async fn save_field_groups(&self, site_id: SiteId, groups: Vec<FieldGroup>) -> AppResult<()>;
}

/// Port for persisted field values keyed by field name and entity.
#[async_trait]
pub trait FieldValueStore: Send + Sync {
    /// Returns the stored value, if any.
    async fn get_field_value(
        &self,
        site_id: SiteId,
        field_name: &str,
        entity_id: &EntityId,
    ) -> AppResult<Option<Value>>;

    /// Stores a value, replacing the previous one.
    async fn save_field_value(
        &self,
        site_id: SiteId,
        field_name: &str,
        entity_id: &EntityId,
        value: Value,
    ) -> AppResult<()>;
}

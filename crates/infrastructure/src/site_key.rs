use fieldgate_core::{AppError, AppResult, SiteId};

/// Converts a site id into its `BIGINT` column value.
pub(crate) fn site_key(site_id: SiteId) -> AppResult<i64> {
    i64::try_from(site_id.as_u64()).map_err(|_| {
        AppError::Validation(format!("site id '{site_id}' exceeds the storage range"))
    })
}

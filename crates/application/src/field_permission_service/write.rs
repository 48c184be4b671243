use super::*;

impl FieldPermissionService {
    /// Resolves the value to persist for a submitted field value.
    ///
    /// The stored value is only read when the submission has to be reverted
    /// in whole or in part.
    pub async fn enforce_update(
        &self,
        user: &UserIdentity,
        field: &FieldDescriptor,
        entity_id: &EntityId,
        submitted: Value,
    ) -> AppResult<Value> {
        let site_id = user.site_id();
        let grants = self.grant_repository.load_grant_table(site_id).await?;
        let plan = self.policy.plan_write(field, &submitted, &grants, user);

        if !plan.requires_stored_value() {
            return Ok(submitted);
        }

        let stored = self
            .value_store
            .get_field_value(site_id, storage_name(field), entity_id)
            .await?;

        warn!(
            site_id = %site_id,
            subject = user.subject(),
            field_key = field.key(),
            entity_id = %entity_id,
            plan = ?plan,
            "reverting unauthorized field write"
        );

        Ok(plan.apply(submitted, stored))
    }

    /// Enforces a submitted value and persists the accepted result.
    pub async fn update_value(
        &self,
        user: &UserIdentity,
        field: &FieldDescriptor,
        entity_id: &EntityId,
        submitted: Value,
    ) -> AppResult<Value> {
        let accepted = self
            .enforce_update(user, field, entity_id, submitted)
            .await?;

        self.value_store
            .save_field_value(user.site_id(), storage_name(field), entity_id, accepted.clone())
            .await?;

        Ok(accepted)
    }
}

fn storage_name(field: &FieldDescriptor) -> &str {
    if field.name().is_empty() {
        field.key()
    } else {
        field.name()
    }
}

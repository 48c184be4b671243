use super::*;

impl FieldPermissionService {
    /// Applies render-time enforcement to a field about to be shown.
    pub async fn load_field(
        &self,
        user: &UserIdentity,
        field: FieldDescriptor,
    ) -> AppResult<FieldDescriptor> {
        let grants = self
            .grant_repository
            .load_grant_table(user.site_id())
            .await?;

        if self.policy.field_access(&field, &grants, user) == FieldAccess::Denied {
            debug!(
                site_id = %user.site_id(),
                subject = user.subject(),
                field_key = field.key(),
                "locking field for render"
            );
        }

        Ok(self.policy.enforce_render(field, &grants, user))
    }
}

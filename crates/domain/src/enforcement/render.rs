use super::*;

impl FieldPolicy {
    /// Prepares a field for display.
    ///
    /// Fields the user may not edit come back read-only and disabled with the
    /// denial notice and the lockdown of their kind applied. Every other field
    /// comes back unchanged.
    #[must_use]
    pub fn enforce_render(
        &self,
        mut field: FieldDescriptor,
        grants: &GrantTable,
        user: &UserIdentity,
    ) -> FieldDescriptor {
        if self.field_access(&field, grants, user) == FieldAccess::Denied {
            field.lock_down(&self.denied_notice);
        }

        field
    }
}

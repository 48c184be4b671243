use std::collections::BTreeSet;

use fieldgate_core::{AppError, AppResult, UserIdentity};
use serde_json::Value;

use crate::access::AccessGate;
use crate::field::{FieldDescriptor, FieldKind};
use crate::grant::{FieldAccess, GrantTable};

mod render;
mod write;

#[cfg(test)]
mod tests;

pub use write::WritePlan;

/// Field name that is always editable regardless of grants.
pub const DEFAULT_EXEMPT_FIELD: &str = "iframe_embed_code";

/// Notice appended to the instructions of fields the user may not edit.
pub const DEFAULT_DENIED_NOTICE: &str = "You do not have permission to edit this field.";

/// Field-level enforcement policy shared by the render and write hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    gate: AccessGate,
    exempt_field_names: BTreeSet<String>,
    denied_notice: String,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            gate: AccessGate::default(),
            exempt_field_names: BTreeSet::from([DEFAULT_EXEMPT_FIELD.to_owned()]),
            denied_notice: DEFAULT_DENIED_NOTICE.to_owned(),
        }
    }
}

impl FieldPolicy {
    /// Creates a policy with validated settings.
    pub fn new<I, S>(
        gate: AccessGate,
        exempt_field_names: I,
        denied_notice: impl Into<String>,
    ) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let denied_notice = denied_notice.into();
        if denied_notice.trim().is_empty() {
            return Err(AppError::Validation(
                "denied field notice must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            gate,
            exempt_field_names: exempt_field_names
                .into_iter()
                .map(Into::into)
                .filter(|name| !name.trim().is_empty())
                .collect(),
            denied_notice,
        })
    }

    /// Returns the access gate.
    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Returns whether both hooks leave this field untouched for this user.
    #[must_use]
    pub fn bypasses(&self, field: &FieldDescriptor, user: &UserIdentity) -> bool {
        self.exempt_field_names.contains(field.name()) || self.gate.is_privileged(user)
    }

    /// Resolves whether the user may edit the field.
    #[must_use]
    pub fn field_access(
        &self,
        field: &FieldDescriptor,
        grants: &GrantTable,
        user: &UserIdentity,
    ) -> FieldAccess {
        if self.bypasses(field, user) || matches!(field.kind(), FieldKind::Tab) {
            return FieldAccess::Unrestricted;
        }

        grants.access_for(field.key(), user.roles())
    }
}

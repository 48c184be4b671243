use std::collections::BTreeMap;

use fieldgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Name of the settings form array carrying the grant checkboxes.
pub const PERMISSIONS_FORM_FIELD: &str = "permissions";

/// Outcome of looking up one field for one user in a grant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// The field has no grant entry at all and is editable by everyone.
    Unrestricted,
    /// At least one of the user's roles holds a grant.
    Granted,
    /// The field is access-controlled and none of the user's roles holds a grant.
    Denied,
}

impl FieldAccess {
    /// Returns whether the user may edit the field.
    #[must_use]
    pub fn is_editable(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Field key to role name to grant flag.
///
/// A field key without any entry is not access-controlled: every role may
/// edit it. A field key with at least one entry is access-controlled, and a
/// role missing from that entry holds no grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantTable {
    entries: BTreeMap<String, BTreeMap<String, bool>>,
}

impl GrantTable {
    /// Help text shown next to the permission matrix.
    pub const UNCONFIGURED_FIELD_HELP: &'static str = "Fields without any checked role are not \
        access-controlled and stay editable by every role. Check at least one role to restrict \
        a field.";

    /// Creates an empty table where every field is unrestricted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a grant flag for a field and role.
    pub fn set_grant(
        &mut self,
        field_key: impl Into<String>,
        role: impl Into<String>,
        granted: bool,
    ) -> AppResult<()> {
        let field_key = field_key.into();
        let role = role.into();
        if field_key.trim().is_empty() || role.trim().is_empty() {
            return Err(AppError::Validation(
                "grant field key and role must not be empty".to_owned(),
            ));
        }

        self.entries
            .entry(field_key)
            .or_default()
            .insert(role, granted);
        Ok(())
    }

    /// Returns whether the field has any grant entry.
    #[must_use]
    pub fn is_controlled(&self, field_key: &str) -> bool {
        self.entries.contains_key(field_key)
    }

    /// Returns whether the role holds an explicit grant for the field.
    #[must_use]
    pub fn is_granted(&self, field_key: &str, role: &str) -> bool {
        self.entries
            .get(field_key)
            .and_then(|roles| roles.get(role))
            .copied()
            .unwrap_or(false)
    }

    /// Resolves access for a user holding `roles`.
    #[must_use]
    pub fn access_for<S: AsRef<str>>(&self, field_key: &str, roles: &[S]) -> FieldAccess {
        let Some(grants) = self.entries.get(field_key) else {
            return FieldAccess::Unrestricted;
        };

        let has_grant = roles
            .iter()
            .any(|role| grants.get(role.as_ref()).copied().unwrap_or(false));

        if has_grant {
            FieldAccess::Granted
        } else {
            FieldAccess::Denied
        }
    }

    /// Returns the number of access-controlled fields.
    #[must_use]
    pub fn controlled_field_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterates field keys with their role grants.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, bool>)> {
        self.entries
            .iter()
            .map(|(field_key, roles)| (field_key.as_str(), roles))
    }

    /// Returns the settings form input name for a field and role.
    #[must_use]
    pub fn form_input_name(field_key: &str, role: &str) -> String {
        format!("{PERMISSIONS_FORM_FIELD}[{field_key}][{role}]")
    }

    /// Builds a table from submitted settings form pairs.
    ///
    /// Only `permissions[<field key>][<role>]` inputs are read; every other
    /// input (submit buttons, nonces) is ignored. The resulting table replaces
    /// the stored one wholesale, so a field whose checkboxes were all cleared
    /// drops out of the table and becomes unrestricted.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();

        for (name, value) in pairs {
            let name = name.as_ref();
            let Some(path) = name
                .strip_prefix(PERMISSIONS_FORM_FIELD)
                .filter(|rest| rest.starts_with('['))
            else {
                continue;
            };

            let (field_key, role) = parse_grant_path(path).ok_or_else(|| {
                AppError::Validation(format!("malformed permission input name '{name}'"))
            })?;

            if is_truthy(value.as_ref()) {
                table.set_grant(field_key, role, true)?;
            }
        }

        Ok(table)
    }
}

fn parse_grant_path(path: &str) -> Option<(&str, &str)> {
    let inner = path.strip_prefix('[')?.strip_suffix(']')?;
    let (field_key, role) = inner.split_once("][")?;
    let is_segment = |segment: &str| {
        !segment.trim().is_empty() && !segment.contains('[') && !segment.contains(']')
    };

    (is_segment(field_key) && is_segment(role)).then_some((field_key, role))
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::{FieldAccess, GrantTable};

    fn table() -> GrantTable {
        let mut table = GrantTable::new();
        assert!(table.set_grant("field_title", "corporate", true).is_ok());
        assert!(table.set_grant("field_title", "franchisee", false).is_ok());
        table
    }

    #[test]
    fn missing_entry_is_unrestricted() {
        assert_eq!(
            table().access_for("field_other", &["franchisee"]),
            FieldAccess::Unrestricted
        );
    }

    #[test]
    fn any_granted_role_grants_access() {
        let table = table();
        assert_eq!(
            table.access_for("field_title", &["franchisee", "corporate"]),
            FieldAccess::Granted
        );
        assert_eq!(
            table.access_for("field_title", &["franchisee"]),
            FieldAccess::Denied
        );
        assert_eq!(
            table.access_for::<&str>("field_title", &[]),
            FieldAccess::Denied
        );
    }

    #[test]
    fn form_pairs_build_table_and_ignore_other_inputs() {
        let pairs = [
            ("permissions[field_title][corporate]", "on"),
            ("permissions[field_body][franchisee]", "on"),
            ("permissions[field_body][corporate]", "0"),
            ("submit", "Save Permissions"),
            ("custom_roles_permissions", "nonce"),
        ];

        let parsed = GrantTable::from_form_pairs(pairs);
        assert!(parsed.is_ok());
        let parsed = parsed.unwrap_or_default();

        assert!(parsed.is_granted("field_title", "corporate"));
        assert!(parsed.is_granted("field_body", "franchisee"));
        assert!(!parsed.is_granted("field_body", "corporate"));
        assert_eq!(parsed.controlled_field_count(), 2);
    }

    #[test]
    fn cleared_checkboxes_leave_field_unrestricted() {
        let parsed = GrantTable::from_form_pairs([("permissions[field_title][corporate]", "")])
            .unwrap_or_default();

        assert!(!parsed.is_controlled("field_title"));
    }

    #[test]
    fn malformed_permission_names_are_rejected() {
        for name in [
            "permissions[field_title]",
            "permissions[field_title][]",
            "permissions[][corporate]",
            "permissions[field_title][corporate][extra]",
        ] {
            assert!(
                GrantTable::from_form_pairs([(name, "on")]).is_err(),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn form_input_name_matches_parser() {
        let name = GrantTable::form_input_name("field_title", "corporate");
        let parsed = GrantTable::from_form_pairs([(name.as_str(), "on")]).unwrap_or_default();
        assert!(parsed.is_granted("field_title", "corporate"));
    }

    #[test]
    fn serializes_as_nested_object() {
        let json = serde_json::to_value(table()).unwrap_or_default();
        assert_eq!(json["field_title"]["corporate"], serde_json::json!(true));
    }
}

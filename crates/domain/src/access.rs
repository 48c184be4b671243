use std::collections::BTreeSet;

use fieldgate_core::UserIdentity;

/// Capability held by site administrators.
pub const ADMINISTRATOR_CAPABILITY: &str = "administrator";

/// Capability required to manage plugin settings.
pub const MANAGE_OPTIONS_CAPABILITY: &str = "manage_options";

/// Coarse privilege checks that bypass field-level restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    administrator_capabilities: BTreeSet<String>,
    elevated_roles: BTreeSet<String>,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(
            [ADMINISTRATOR_CAPABILITY],
            [crate::CustomRole::FranchiseBusinessConsultant.as_str()],
        )
    }
}

impl AccessGate {
    /// Creates a gate from administrator-equivalent capabilities and elevated roles.
    #[must_use]
    pub fn new<A, E, S, T>(administrator_capabilities: A, elevated_roles: E) -> Self
    where
        A: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            administrator_capabilities: normalized(administrator_capabilities),
            elevated_roles: normalized(elevated_roles),
        }
    }

    /// Returns the elevated roles.
    #[must_use]
    pub fn elevated_roles(&self) -> &BTreeSet<String> {
        &self.elevated_roles
    }

    /// Returns whether the user is a site administrator or a network super admin.
    #[must_use]
    pub fn is_administrator(&self, user: &UserIdentity) -> bool {
        user.is_super_admin()
            || self
                .administrator_capabilities
                .iter()
                .any(|capability| user.has_capability(capability))
    }

    /// Returns whether the user bypasses every field restriction.
    #[must_use]
    pub fn is_privileged(&self, user: &UserIdentity) -> bool {
        self.is_administrator(user)
            || self
                .elevated_roles
                .iter()
                .any(|role| user.has_capability(role))
    }

    /// Returns whether the user may view and change the permission settings.
    #[must_use]
    pub fn can_manage_settings(&self, user: &UserIdentity) -> bool {
        self.is_administrator(user) || user.has_capability(MANAGE_OPTIONS_CAPABILITY)
    }
}

fn normalized<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect()
}

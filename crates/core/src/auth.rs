use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::SiteId;

/// Acting user as reported by the host platform for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    site_id: SiteId,
    roles: Vec<String>,
    capabilities: BTreeSet<String>,
    is_super_admin: bool,
}

impl UserIdentity {
    /// Creates a user identity without roles or capabilities.
    #[must_use]
    pub fn new(subject: impl Into<String>, display_name: impl Into<String>, site_id: SiteId) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            site_id,
            roles: Vec::new(),
            capabilities: BTreeSet::new(),
            is_super_admin: false,
        }
    }

    /// Replaces the assigned role names, keeping their order and dropping duplicates.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        self.roles = roles
            .into_iter()
            .map(Into::into)
            .filter(|role| !role.trim().is_empty() && seen.insert(role.clone()))
            .collect();
        self
    }

    /// Replaces the effective capability set.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities
            .into_iter()
            .map(Into::into)
            .filter(|capability| !capability.trim().is_empty())
            .collect();
        self
    }

    /// Marks the user as a network super admin.
    #[must_use]
    pub fn with_super_admin(mut self, is_super_admin: bool) -> Self {
        self.is_super_admin = is_super_admin;
        self
    }

    /// Returns the stable subject identifier (host user id or login).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the site the request is scoped to.
    #[must_use]
    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// Returns the assigned role names.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns the effective capability set.
    #[must_use]
    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns whether the user is a network super admin.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    /// Returns whether the user holds the named role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|assigned| assigned == role)
    }

    /// Returns whether a capability check for `name` passes.
    ///
    /// Role names pass capability checks the same way explicit capabilities do.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.contains(name) || self.has_role(name)
    }
}

use std::collections::BTreeSet;
use std::str::FromStr;

use fieldgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Built-in host role that custom roles may be derived from.
pub const ADMINISTRATOR_ROLE: &str = "administrator";

/// Built-in host role that most custom roles are derived from.
pub const EDITOR_ROLE: &str = "editor";

/// Capabilities granting access to the custom dashboards.
pub const DASHBOARD_CAPABILITIES: &[&str] =
    &["read_looker_studio_dashboard", "read_help_documents_dashboard"];

/// Capabilities for managing the `estate-sale` post type.
pub const ESTATE_SALE_CAPABILITIES: &[&str] = &[
    "read_estate-sale",
    "read_private_estate-sales",
    "edit_estate-sale",
    "edit_estate-sales",
    "edit_others_estate-sales",
    "edit_published_estate-sales",
    "publish_estate-sales",
    "delete_estate-sales",
    "delete_others_estate-sales",
    "delete_private_estate-sales",
    "delete_published_estate-sales",
];

/// Page management capabilities granted to franchisees.
pub const PAGE_MANAGEMENT_CAPABILITIES: &[&str] = &[
    "edit_pages",
    "edit_published_pages",
    "publish_pages",
    "delete_pages",
    "delete_published_pages",
    "edit_private_pages",
    "read_private_pages",
];

/// Form plugin capabilities granted to business consultants.
pub const FORM_PLUGIN_CAPABILITIES: &[&str] = &[
    "gravityforms_view_entries",
    "gravityforms_edit_entries",
    "gravityforms_delete_entries",
    "gravityforms_edit_forms",
    "gravityforms_delete_forms",
    "gravityforms_create_form",
    "gravityforms_view_settings",
    "gravityforms_edit_settings",
    "gravityforms_export_entries",
    "gravityforms_view_updates",
    "gravityforms_view_addons",
    "gform_full_access",
];

const EDITOR_CAPABILITIES: &[&str] = &[
    "moderate_comments",
    "manage_categories",
    "manage_links",
    "upload_files",
    "unfiltered_html",
    "edit_posts",
    "edit_others_posts",
    "edit_published_posts",
    "publish_posts",
    "edit_pages",
    "read",
    "edit_others_pages",
    "edit_published_pages",
    "publish_pages",
    "delete_pages",
    "delete_others_pages",
    "delete_published_pages",
    "delete_posts",
    "delete_others_posts",
    "delete_published_posts",
    "delete_private_posts",
    "edit_private_posts",
    "read_private_posts",
    "delete_private_pages",
    "edit_private_pages",
    "read_private_pages",
    "level_7",
    "level_6",
    "level_5",
    "level_4",
    "level_3",
    "level_2",
    "level_1",
    "level_0",
];

const ADMINISTRATOR_ONLY_CAPABILITIES: &[&str] = &[
    "switch_themes",
    "edit_themes",
    "activate_plugins",
    "edit_plugins",
    "edit_users",
    "edit_files",
    "manage_options",
    "import",
    "edit_dashboard",
    "list_users",
    "remove_users",
    "promote_users",
    "edit_theme_options",
    "delete_themes",
    "export",
    "delete_users",
    "create_users",
    "install_plugins",
    "update_plugins",
    "install_themes",
    "update_themes",
    "update_core",
    "level_10",
    "level_9",
    "level_8",
];

/// Custom roles managed by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomRole {
    /// Restricted staff role carrying administrator capabilities.
    FsmRestricted,
    /// Corporate editors.
    Corporate,
    /// Franchise owners editing their own site.
    Franchisee,
    /// Consultants that bypass field restrictions.
    FranchiseBusinessConsultant,
}

impl CustomRole {
    /// Returns the stable role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FsmRestricted => "fsm_restricted",
            Self::Corporate => "corporate",
            Self::Franchisee => "franchisee",
            Self::FranchiseBusinessConsultant => "franchise_business_consultant",
        }
    }

    /// Returns all custom roles in provisioning order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[CustomRole] = &[
            CustomRole::FsmRestricted,
            CustomRole::Corporate,
            CustomRole::Franchisee,
            CustomRole::FranchiseBusinessConsultant,
        ];

        ALL
    }

    /// Returns the roles offered as permission matrix columns by default.
    #[must_use]
    pub fn matrix_defaults() -> &'static [Self] {
        const DEFAULTS: &[CustomRole] = &[
            CustomRole::FsmRestricted,
            CustomRole::Corporate,
            CustomRole::Franchisee,
        ];

        DEFAULTS
    }

    /// Returns the display name, e.g. `Franchise Business Consultant`.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name_for(self.as_str())
    }

    /// Returns the built-in role this role copies its capabilities from.
    #[must_use]
    pub fn base_role(&self) -> &'static str {
        match self {
            Self::FsmRestricted => ADMINISTRATOR_ROLE,
            Self::Corporate | Self::Franchisee | Self::FranchiseBusinessConsultant => EDITOR_ROLE,
        }
    }

    /// Returns capabilities added on top of the base role.
    #[must_use]
    pub fn additional_capabilities(&self) -> Vec<&'static str> {
        match self {
            Self::FsmRestricted => Vec::new(),
            Self::Corporate => ESTATE_SALE_CAPABILITIES.to_vec(),
            Self::Franchisee => [ESTATE_SALE_CAPABILITIES, PAGE_MANAGEMENT_CAPABILITIES].concat(),
            Self::FranchiseBusinessConsultant => {
                [ESTATE_SALE_CAPABILITIES, FORM_PLUGIN_CAPABILITIES].concat()
            }
        }
    }

    /// Builds the role definition from its base role.
    pub fn definition_from(&self, base: &RoleDefinition) -> AppResult<RoleDefinition> {
        if base.name() != self.base_role() {
            return Err(AppError::Validation(format!(
                "role '{}' must be derived from '{}', got '{}'",
                self.as_str(),
                self.base_role(),
                base.name()
            )));
        }

        RoleDefinition::new(
            self.as_str(),
            self.display_name(),
            base.capabilities().iter().cloned().chain(
                self.additional_capabilities()
                    .into_iter()
                    .map(str::to_owned),
            ),
        )
    }
}

impl FromStr for CustomRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown custom role '{value}'")))
    }
}

/// Named role with its capability set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    name: NonEmptyString,
    display_name: NonEmptyString,
    capabilities: BTreeSet<String>,
}

impl RoleDefinition {
    /// Creates a validated role definition.
    pub fn new<I, S>(
        name: impl Into<String>,
        display_name: impl Into<String>,
        capabilities: I,
    ) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            display_name: NonEmptyString::new(display_name)?,
            capabilities: capabilities
                .into_iter()
                .map(Into::into)
                .filter(|capability| !capability.trim().is_empty())
                .collect(),
        })
    }

    /// Returns the host's default administrator role.
    pub fn builtin_administrator() -> AppResult<Self> {
        Self::new(
            ADMINISTRATOR_ROLE,
            display_name_for(ADMINISTRATOR_ROLE),
            EDITOR_CAPABILITIES
                .iter()
                .chain(ADMINISTRATOR_ONLY_CAPABILITIES)
                .copied(),
        )
    }

    /// Returns the host's default editor role.
    pub fn builtin_editor() -> AppResult<Self> {
        Self::new(
            EDITOR_ROLE,
            display_name_for(EDITOR_ROLE),
            EDITOR_CAPABILITIES.iter().copied(),
        )
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the capability set.
    #[must_use]
    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    /// Returns whether the role grants a capability.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Adds capabilities, returning how many were not present before.
    pub fn add_capabilities<I, S>(&mut self, capabilities: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        capabilities
            .into_iter()
            .map(Into::into)
            .filter(|capability| !capability.trim().is_empty())
            .filter(|capability| self.capabilities.insert(capability.clone()))
            .count()
    }
}

fn display_name_for(role: &str) -> String {
    role.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

use fieldgate_application::RoleProvisioningReport;
use fieldgate_domain::RoleDefinition;
use serde::Serialize;
use ts_rs::TS;

/// API representation of a site role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub name: String,
    pub display_name: String,
    pub capabilities: Vec<String>,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            name: value.name().to_owned(),
            display_name: value.display_name().to_owned(),
            capabilities: value.capabilities().iter().cloned().collect(),
        }
    }
}

/// Outcome of a custom role provisioning run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/provision-roles-response.ts"
)]
pub struct ProvisionRolesResponse {
    pub created_roles: Vec<String>,
    pub added_capabilities: u32,
    pub roles: Vec<RoleResponse>,
}

impl From<RoleProvisioningReport> for ProvisionRolesResponse {
    fn from(value: RoleProvisioningReport) -> Self {
        Self {
            created_roles: value.created_roles,
            added_capabilities: u32::try_from(value.added_capabilities).unwrap_or(u32::MAX),
            roles: value.roles.into_iter().map(RoleResponse::from).collect(),
        }
    }
}

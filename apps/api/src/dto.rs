use serde::Serialize;
use ts_rs::TS;

mod admin_menu;
mod hooks;
mod roles;
mod settings;

pub use admin_menu::{AdminMenuRequest, AdminMenuResponse};
pub use hooks::{LoadFieldRequest, LoadFieldResponse, UpdateValueRequest, UpdateValueResponse};
pub use roles::{ProvisionRolesResponse, RoleResponse};
pub use settings::{
    MatrixCheckboxResponse, MatrixRowResponse, MatrixSectionResponse, PermissionMatrixResponse,
    PublishFieldGroupsRequest, PublishFieldGroupsResponse, SavePermissionsResponse,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

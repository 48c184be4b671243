use std::sync::Arc;

use fieldgate_application::{
    FieldPermissionService, PermissionMatrixService, RoleProvisioningService,
};
use fieldgate_domain::AdminMenuPolicy;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub field_permission_service: FieldPermissionService,
    pub permission_matrix_service: PermissionMatrixService,
    pub role_provisioning_service: RoleProvisioningService,
    pub admin_menu_policy: AdminMenuPolicy,
    pub host_token: Arc<str>,
}

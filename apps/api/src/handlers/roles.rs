use axum::Json;
use axum::extract::{Extension, State};
use fieldgate_core::UserIdentity;

use crate::dto::{ProvisionRolesResponse, RoleResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn provision_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<ProvisionRolesResponse>> {
    let report = state
        .role_provisioning_service
        .provision_custom_roles(&user)
        .await?;

    Ok(Json(ProvisionRolesResponse::from(report)))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_provisioning_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

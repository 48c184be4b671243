use axum::extract::{Extension, State};
use axum::{Form, Json};
use fieldgate_core::UserIdentity;

use crate::dto::{PermissionMatrixResponse, SavePermissionsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn permission_matrix_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<PermissionMatrixResponse>> {
    let matrix = state
        .permission_matrix_service
        .permission_matrix(&user)
        .await?;

    Ok(Json(PermissionMatrixResponse::from(matrix)))
}

pub async fn save_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Json<SavePermissionsResponse>> {
    let table = state
        .permission_matrix_service
        .save_permissions(&user, pairs)
        .await?;

    Ok(Json(SavePermissionsResponse {
        message: "Permissions saved.".to_owned(),
        controlled_fields: u32::try_from(table.controlled_field_count()).unwrap_or(u32::MAX),
    }))
}

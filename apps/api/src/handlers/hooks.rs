use axum::Json;
use axum::extract::{Extension, State};
use fieldgate_core::{EntityId, UserIdentity};

use crate::dto::{LoadFieldRequest, LoadFieldResponse, UpdateValueRequest, UpdateValueResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn load_field_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<LoadFieldRequest>,
) -> ApiResult<Json<LoadFieldResponse>> {
    let field = state
        .field_permission_service
        .load_field(&user, payload.field)
        .await?;

    Ok(Json(LoadFieldResponse { field }))
}

pub async fn update_value_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<UpdateValueRequest>,
) -> ApiResult<Json<UpdateValueResponse>> {
    let entity_id = EntityId::new(payload.entity_id)?;
    let submitted = payload.value;
    let value = state
        .field_permission_service
        .update_value(&user, &payload.field, &entity_id, submitted.clone())
        .await?;

    Ok(Json(UpdateValueResponse {
        reverted: value != submitted,
        value,
    }))
}

use axum::Json;
use axum::extract::{Extension, State};
use fieldgate_core::UserIdentity;

use crate::dto::{PublishFieldGroupsRequest, PublishFieldGroupsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn publish_field_groups_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<PublishFieldGroupsRequest>,
) -> ApiResult<Json<PublishFieldGroupsResponse>> {
    let published = state
        .permission_matrix_service
        .publish_field_groups(&user, payload.field_groups)
        .await?;

    Ok(Json(PublishFieldGroupsResponse {
        published: u32::try_from(published).unwrap_or(u32::MAX),
    }))
}

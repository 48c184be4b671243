use axum::Json;
use axum::extract::{Extension, State};
use fieldgate_core::UserIdentity;

use crate::dto::{AdminMenuRequest, AdminMenuResponse};
use crate::state::AppState;

pub async fn admin_menu_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<AdminMenuRequest>,
) -> Json<AdminMenuResponse> {
    let policy = &state.admin_menu_policy;
    let menu = policy.filter(payload.menu, &user);

    Json(AdminMenuResponse::new(menu, policy.chrome(&user)))
}

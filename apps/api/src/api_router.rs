use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/hooks/load-field",
            post(handlers::hooks::load_field_handler),
        )
        .route(
            "/api/hooks/update-value",
            post(handlers::hooks::update_value_handler),
        )
        .route(
            "/api/settings/permissions",
            get(handlers::settings::permission_matrix_handler)
                .post(handlers::settings::save_permissions_handler),
        )
        .route(
            "/api/field-groups",
            put(handlers::field_groups::publish_field_groups_handler),
        )
        .route("/api/roles", get(handlers::roles::list_roles_handler))
        .route(
            "/api/roles/provision",
            post(handlers::roles::provision_roles_handler),
        )
        .route(
            "/api/admin/menu",
            post(handlers::admin_menu::admin_menu_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_host_identity,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

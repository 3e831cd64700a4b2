use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn staff_assignment_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_assignment))
        .route("/client/{client_id}", get(list_assignments))
        .route("/{id}", patch(update_assignment).delete(delete_assignment))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

/// Administrative settings; writes are limited to admins, staff may read
/// their own preferences.
pub fn admin_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/preferences", post(set_preference))
        .route("/preferences/{user_id}", get(list_preferences))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

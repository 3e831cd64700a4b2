use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_appointment).get(handlers::list_appointments))
        // Registered ahead of `/{id}` so "calendar" is never parsed as an id
        .route("/calendar", get(handlers::calendar_view))
        .route(
            "/{id}",
            get(handlers::get_appointment)
                .patch(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn telehealth_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/sessions",
            post(handlers::create_telehealth_session).get(handlers::list_telehealth_sessions),
        )
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

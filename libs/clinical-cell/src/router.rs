use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn note_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_note))
        .route("/client/{client_id}", get(list_notes))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn assessment_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_assessment))
        .route("/client/{client_id}", get(list_assessments))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn client_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route("/{id}", get(get_client).patch(update_client).delete(delete_client))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn family_contact_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_family_contact))
        .route("/client/{client_id}", get(list_family_contacts))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn insurance_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(upsert_insurance))
        .route("/client/{client_id}", get(get_insurance))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn document_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_document))
        .route("/client/{client_id}", get(list_documents))
        .route("/{id}", delete(delete_document))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn reminder_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_reminder))
        .route("/client/{client_id}", get(list_reminders))
        .route("/{id}/complete", post(complete_reminder))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

pub fn dashboard_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

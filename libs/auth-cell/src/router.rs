use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::{LogNotificationSink, NotificationSink};

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    auth_routes_with_notifier(state, Arc::new(LogNotificationSink))
}

pub fn auth_routes_with_notifier(state: Arc<AppConfig>, notifier: Arc<dyn NotificationSink>) -> Router {
    let public_routes = Router::new()
        .route("/users", post(handlers::create_user))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/verify-reset-token", post(handlers::verify_reset_token))
        .route("/reset-password", post(handlers::reset_password))
        .route("/validate", post(handlers::validate_token))
        .route("/verify", post(handlers::verify_token));

    let protected_routes = Router::new()
        .route("/me", get(handlers::get_me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(notifier))
        .with_state(state)
}

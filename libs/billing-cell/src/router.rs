use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn billing_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/invoices", post(create_invoice).get(list_invoices))
        .route("/claims", post(create_claim).get(list_claims))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}

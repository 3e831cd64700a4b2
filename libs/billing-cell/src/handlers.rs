use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BillingError, BillingQuery, Claim, CreateClaimRequest, CreateInvoiceRequest, Invoice};
use crate::services::{ClaimService, InvoiceService};

#[axum::debug_handler]
pub async fn create_invoice(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let invoice = InvoiceService::new(&config).create_invoice(request).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[axum::debug_handler]
pub async fn list_invoices(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<BillingQuery>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = InvoiceService::new(&config)
        .list_invoices(query.client_id)
        .await
        .map_err(BillingError::Store)?;

    Ok(Json(invoices))
}

#[axum::debug_handler]
pub async fn create_claim(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<Claim>), AppError> {
    let claim = ClaimService::new(&config).create_claim(request).await?;
    Ok((StatusCode::CREATED, Json(claim)))
}

#[axum::debug_handler]
pub async fn list_claims(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<BillingQuery>,
) -> Result<Json<Vec<Claim>>, AppError> {
    let claims = ClaimService::new(&config)
        .list_claims(query.client_id)
        .await
        .map_err(BillingError::Store)?;

    Ok(Json(claims))
}

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use scheduling_cell::ReferentialValidator;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::entities::Client;
use shared_models::error::AppError;
use shared_utils::extractor::{current_staff_id, require_role};

use crate::models::{
    ClientError, ClientPatch, ClientSearchQuery, CreateClientRequest, CreateDocumentRequest,
    CreateFamilyContactRequest, CreateReminderRequest, Document, DocumentSearchQuery, FamilyContact,
    InsuranceInfo, Reminder, UpsertInsuranceRequest,
};
use crate::services::{
    ClientService, DashboardService, DocumentService, FamilyContactService, InsuranceService,
    ReminderService,
};

fn store_error(e: anyhow::Error) -> AppError {
    AppError::from(ClientError::Store(e))
}

async fn require_client(config: &AppConfig, client_id: i64) -> Result<(), AppError> {
    ReferentialValidator::for_config(config)
        .require_client(client_id)
        .await?;
    Ok(())
}

// ==============================================================================
// CLIENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_client(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    debug!("User {} creating client", user.id);

    let client = ClientService::new(&config).create_client(request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[axum::debug_handler]
pub async fn list_clients(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<ClientSearchQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = ClientService::new(&config)
        .list_clients(query.search.as_deref())
        .await
        .map_err(store_error)?;

    Ok(Json(clients))
}

#[axum::debug_handler]
pub async fn get_client(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Client>, AppError> {
    let client = ClientService::new(&config).get_client(client_id).await?;
    Ok(Json(client))
}

#[axum::debug_handler]
pub async fn update_client(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
    Json(patch): Json<ClientPatch>,
) -> Result<Json<Client>, AppError> {
    let client = ClientService::new(&config).update_client(client_id, patch).await?;
    Ok(Json(client))
}

#[axum::debug_handler]
pub async fn delete_client(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(client_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &["admin"])?;

    ClientService::new(&config).delete_client(client_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Client deleted successfully",
        "client_id": client_id,
    })))
}

// ==============================================================================
// FAMILY CONTACTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_family_contact(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateFamilyContactRequest>,
) -> Result<(StatusCode, Json<FamilyContact>), AppError> {
    if request.name.trim().is_empty() {
        return Err(ClientError::Validation("name is required".to_string()).into());
    }
    require_client(&config, request.client_id).await?;

    let contact = FamilyContactService::new(&config)
        .create_contact(request)
        .await
        .map_err(store_error)?;

    Ok((StatusCode::CREATED, Json(contact)))
}

#[axum::debug_handler]
pub async fn list_family_contacts(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<FamilyContact>>, AppError> {
    let contacts = FamilyContactService::new(&config)
        .list_for_client(client_id)
        .await
        .map_err(store_error)?;

    Ok(Json(contacts))
}

// ==============================================================================
// INSURANCE
// ==============================================================================

#[axum::debug_handler]
pub async fn upsert_insurance(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<UpsertInsuranceRequest>,
) -> Result<Json<InsuranceInfo>, AppError> {
    require_client(&config, request.client_id).await?;

    let info = InsuranceService::new(&config)
        .upsert(request)
        .await
        .map_err(store_error)?;

    Ok(Json(info))
}

/// Responds with JSON `null` when the client has no insurance on file.
#[axum::debug_handler]
pub async fn get_insurance(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Option<InsuranceInfo>>, AppError> {
    let info = InsuranceService::new(&config)
        .get_for_client(client_id)
        .await
        .map_err(store_error)?;

    Ok(Json(info))
}

// ==============================================================================
// DOCUMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_document(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let uploaded_by = current_staff_id(&user)?;
    require_client(&config, request.client_id).await?;

    let document = DocumentService::new(&config)
        .create_document(request, uploaded_by)
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

#[axum::debug_handler]
pub async fn list_documents(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
    Query(query): Query<DocumentSearchQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = DocumentService::new(&config)
        .list_for_client(client_id, query.search.as_deref())
        .await
        .map_err(store_error)?;

    Ok(Json(documents))
}

#[axum::debug_handler]
pub async fn delete_document(
    State(config): State<Arc<AppConfig>>,
    Path(document_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    DocumentService::new(&config).delete_document(document_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Document deleted successfully",
        "document_id": document_id,
    })))
}

// ==============================================================================
// REMINDERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_reminder(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    require_client(&config, request.client_id).await?;

    let reminder = ReminderService::new(&config).create_reminder(request).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

#[axum::debug_handler]
pub async fn list_reminders(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let reminders = ReminderService::new(&config)
        .list_for_client(client_id)
        .await
        .map_err(store_error)?;

    Ok(Json(reminders))
}

#[axum::debug_handler]
pub async fn complete_reminder(
    State(config): State<Arc<AppConfig>>,
    Path(reminder_id): Path<i64>,
) -> Result<Json<Reminder>, AppError> {
    let reminder = ReminderService::new(&config).complete_reminder(reminder_id).await?;
    Ok(Json(reminder))
}

// ==============================================================================
// DASHBOARD
// ==============================================================================

#[axum::debug_handler]
pub async fn dashboard(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("User {} loading dashboard", user.id);

    let counts = DashboardService::new(&config).counts().await.map_err(store_error)?;
    Ok(Json(json!({
        "success": true,
        "data": counts,
    })))
}

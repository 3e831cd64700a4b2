use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::entities::ProgressNote;
use shared_models::error::AppError;

use crate::models::{ClinicalError, CreateAssessmentRequest, CreateProgressNoteRequest, InitialAssessment};
use crate::services::{AssessmentService, NoteService};

// ==============================================================================
// PROGRESS NOTES
// ==============================================================================

#[axum::debug_handler]
pub async fn create_note(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateProgressNoteRequest>,
) -> Result<(StatusCode, Json<ProgressNote>), AppError> {
    debug!("User {} writing note for client {}", user.id, request.client_id);

    let note = NoteService::new(&config).create_note(request).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[axum::debug_handler]
pub async fn list_notes(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<ProgressNote>>, AppError> {
    let notes = NoteService::new(&config)
        .list_for_client(client_id)
        .await
        .map_err(ClinicalError::Store)?;

    Ok(Json(notes))
}

// ==============================================================================
// INITIAL ASSESSMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_assessment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<InitialAssessment>), AppError> {
    let assessment = AssessmentService::new(&config).create_assessment(request).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

#[axum::debug_handler]
pub async fn list_assessments(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<InitialAssessment>>, AppError> {
    let assessments = AssessmentService::new(&config)
        .list_for_client(client_id)
        .await
        .map_err(ClinicalError::Store)?;

    Ok(Json(assessments))
}

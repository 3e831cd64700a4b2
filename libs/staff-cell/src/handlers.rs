use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::entities::StaffAssignment;
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{AssignmentPatch, CreateAssignmentRequest, SetPreferenceRequest, StaffError, StaffPreference};
use crate::services::{AssignmentService, PreferenceService};

// ==============================================================================
// STAFF ASSIGNMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_assignment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<StaffAssignment>), AppError> {
    debug!(
        "User {} assigning staff {} to client {}",
        user.id, request.staff_user_id, request.client_id
    );

    let assignment = AssignmentService::new(&config).create_assignment(request).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[axum::debug_handler]
pub async fn list_assignments(
    State(config): State<Arc<AppConfig>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<StaffAssignment>>, AppError> {
    let assignments = AssignmentService::new(&config)
        .list_for_client(client_id)
        .await
        .map_err(StaffError::Store)?;

    Ok(Json(assignments))
}

#[axum::debug_handler]
pub async fn update_assignment(
    State(config): State<Arc<AppConfig>>,
    Path(assignment_id): Path<i64>,
    Json(patch): Json<AssignmentPatch>,
) -> Result<Json<StaffAssignment>, AppError> {
    let assignment = AssignmentService::new(&config)
        .update_assignment(assignment_id, patch)
        .await?;

    Ok(Json(assignment))
}

#[axum::debug_handler]
pub async fn delete_assignment(
    State(config): State<Arc<AppConfig>>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    AssignmentService::new(&config).delete_assignment(assignment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Staff assignment deleted successfully",
        "assignment_id": assignment_id,
    })))
}

// ==============================================================================
// ADMIN: STAFF PREFERENCES
// ==============================================================================

#[axum::debug_handler]
pub async fn set_preference(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<SetPreferenceRequest>,
) -> Result<Json<StaffPreference>, AppError> {
    require_role(&user, &["admin"])?;

    let preference = PreferenceService::new(&config).set_preference(request).await?;
    Ok(Json(preference))
}

#[axum::debug_handler]
pub async fn list_preferences(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<StaffPreference>>, AppError> {
    if user.numeric_id() != Some(user_id) {
        require_role(&user, &["admin"])?;
    }

    let preferences = PreferenceService::new(&config)
        .list_for_user(user_id)
        .await
        .map_err(StaffError::Store)?;

    Ok(Json(preferences))
}

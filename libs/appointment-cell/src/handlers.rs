use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::entities::{Appointment, TelehealthSession};
use shared_models::error::AppError;

use crate::models::{
    AppointmentError, AppointmentPatch, AppointmentQuery, CalendarQuery, CalendarView,
    CreateAppointmentRequest, CreateTelehealthSessionRequest,
};
use crate::services::{AppointmentService, TelehealthService};

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    debug!(
        "User {} booking client {} with provider {}",
        user.id, request.client_id, request.provider_id
    );

    let appointment = AppointmentService::new(&config).create_appointment(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentService::new(&config)
        .list_appointments(&query)
        .await
        .map_err(AppointmentError::Store)?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::new(&config).get_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentService::new(&config)
        .update_appointment(appointment_id, patch)
        .await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let status = AppointmentService::new(&config)
        .delete_appointment(appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully",
        "appointment_id": appointment_id,
        "previous_status": status,
    })))
}

#[axum::debug_handler]
pub async fn calendar_view(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarView>, AppError> {
    let view = AppointmentService::new(&config)
        .calendar(query.start, query.end, query.provider_id)
        .await?;

    Ok(Json(view))
}

// ==============================================================================
// TELEHEALTH
// ==============================================================================

#[axum::debug_handler]
pub async fn create_telehealth_session(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateTelehealthSessionRequest>,
) -> Result<(StatusCode, Json<TelehealthSession>), AppError> {
    let session = TelehealthService::new(&config).create_session(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[axum::debug_handler]
pub async fn list_telehealth_sessions(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Vec<TelehealthSession>>, AppError> {
    let sessions = TelehealthService::new(&config)
        .list_sessions()
        .await
        .map_err(AppointmentError::Store)?;

    Ok(Json(sessions))
}

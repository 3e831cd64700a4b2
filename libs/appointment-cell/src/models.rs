use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use scheduling_cell::SchedulingError;
use shared_models::entities::{Appointment, AppointmentStatus, AppointmentType, TelehealthStatus};
use shared_models::error::AppError;
use shared_utils::patch::nullable;

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub client_id: i64,
    pub provider_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub appointment_type: AppointmentType,
    pub status: Option<AppointmentStatus>,
    pub location: Option<String>,
}

/// Partial update of an appointment; `None` keeps the stored value. The
/// client and provider are fixed once booked because notes and telehealth
/// sessions are linked against them; repeating the stored values is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub client_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub appointment_type: Option<AppointmentType>,
    pub status: Option<AppointmentStatus>,
    /// `null` clears the stored location.
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
}

impl AppointmentPatch {
    pub fn apply_to(self, appointment: &mut Appointment) -> Result<(), AppointmentError> {
        if self.client_id.is_some_and(|id| id != appointment.client_id)
            || self.provider_id.is_some_and(|id| id != appointment.provider_id)
        {
            return Err(AppointmentError::Validation(
                "client_id and provider_id cannot be changed on an existing appointment".to_string(),
            ));
        }

        if let Some(v) = self.start_time {
            appointment.start_time = v;
        }
        if let Some(v) = self.end_time {
            appointment.end_time = v;
        }
        if let Some(v) = self.appointment_type {
            appointment.appointment_type = v;
        }
        if let Some(v) = self.status {
            appointment.status = v;
        }
        if let Some(v) = self.location {
            appointment.location = v;
        }
        Ok(())
    }
}

pub fn appointment_update_body(appointment: &Appointment) -> Value {
    json!({
        "start_time": appointment.start_time.to_rfc3339(),
        "end_time": appointment.end_time.to_rfc3339(),
        "type": appointment.appointment_type,
        "status": appointment.status,
        "location": appointment.location,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentQuery {
    pub client_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarQuery {
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
    pub provider_id: Option<i64>,
}

/// Appointments keyed by the ISO date of their start time.
pub type CalendarView = BTreeMap<String, Vec<Appointment>>;

pub fn group_by_day(appointments: Vec<Appointment>) -> CalendarView {
    let mut days = CalendarView::new();
    for appointment in appointments {
        let day = appointment.start_time.date_naive().to_string();
        days.entry(day).or_default().push(appointment);
    }
    days
}

// ==============================================================================
// TELEHEALTH
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTelehealthSessionRequest {
    pub appointment_id: i64,
    pub client_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub status: Option<TelehealthStatus>,
}

pub fn join_url(base_url: &str, appointment_id: i64) -> String {
    format!("{}/session/{}", base_url.trim_end_matches('/'), appointment_id)
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Scheduling(e) => e.into(),
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

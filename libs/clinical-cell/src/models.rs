use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use scheduling_cell::SchedulingError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgressNoteRequest {
    pub client_id: i64,
    pub provider_id: i64,
    pub appointment_id: Option<i64>,
    pub note_text: String,
    pub dsm5_code: Option<String>,
    pub modifiers: Option<String>,
    pub service_line: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialAssessment {
    pub id: i64,
    pub client_id: i64,
    pub assessment_date: NaiveDate,
    pub presenting_problem: Option<String>,
    pub history: Option<String>,
    pub mental_status: Option<String>,
    pub diagnosis_code: Option<String>,
    pub risk_level: Option<String>,
    pub recommendations: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssessmentRequest {
    pub client_id: i64,
    /// Defaults to the current UTC day.
    pub assessment_date: Option<NaiveDate>,
    pub presenting_problem: Option<String>,
    pub history: Option<String>,
    pub mental_status: Option<String>,
    pub diagnosis_code: Option<String>,
    pub risk_level: Option<String>,
    pub recommendations: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClinicalError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<ClinicalError> for AppError {
    fn from(err: ClinicalError) -> Self {
        match err {
            ClinicalError::Validation(msg) => AppError::ValidationError(msg),
            ClinicalError::Scheduling(e) => e.into(),
            ClinicalError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

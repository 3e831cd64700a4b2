use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use scheduling_cell::{AssignmentProposal, SchedulingError};
use shared_models::entities::{StaffAssignment, StaffRole};
use shared_models::error::AppError;
use shared_utils::patch::nullable;

// ==============================================================================
// STAFF ASSIGNMENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub client_id: i64,
    pub staff_user_id: i64,
    pub role: StaffRole,
    #[serde(default)]
    pub is_primary: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

impl CreateAssignmentRequest {
    pub fn proposal(&self) -> AssignmentProposal {
        AssignmentProposal {
            client_id: self.client_id,
            staff_user_id: self.staff_user_id,
            role: self.role,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Partial update of an assignment. The client and staff member are fixed
/// once the assignment exists; sending them is only accepted when they
/// repeat the stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentPatch {
    pub client_id: Option<i64>,
    pub staff_user_id: Option<i64>,
    pub role: Option<StaffRole>,
    pub is_primary: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `null` clears the stored notes.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl AssignmentPatch {
    pub fn apply_to(self, assignment: &mut StaffAssignment) -> Result<(), StaffError> {
        if self.client_id.is_some_and(|id| id != assignment.client_id)
            || self.staff_user_id.is_some_and(|id| id != assignment.staff_user_id)
        {
            return Err(StaffError::Validation(
                "client_id and staff_user_id cannot be changed on an existing assignment".to_string(),
            ));
        }

        if let Some(v) = self.role {
            assignment.role = v;
        }
        if let Some(v) = self.is_primary {
            assignment.is_primary = v;
        }
        if let Some(v) = self.start_date {
            assignment.start_date = v;
        }
        if let Some(v) = self.end_date {
            assignment.end_date = v;
        }
        if let Some(v) = self.notes {
            assignment.notes = v;
        }
        Ok(())
    }
}

pub fn proposal_for(assignment: &StaffAssignment) -> AssignmentProposal {
    AssignmentProposal {
        client_id: assignment.client_id,
        staff_user_id: assignment.staff_user_id,
        role: assignment.role,
        start_date: assignment.start_date,
        end_date: assignment.end_date,
    }
}

pub fn assignment_update_body(assignment: &StaffAssignment) -> Value {
    json!({
        "role": assignment.role,
        "is_primary": assignment.is_primary,
        "start_date": assignment.start_date,
        "end_date": assignment.end_date,
        "notes": assignment.notes,
    })
}

// ==============================================================================
// STAFF PREFERENCES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffPreference {
    pub id: i64,
    pub user_id: i64,
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPreferenceRequest {
    pub user_id: i64,
    pub key: String,
    pub value: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StaffError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<StaffError> for AppError {
    fn from(err: StaffError) -> Self {
        match err {
            StaffError::NotFound(_) => AppError::NotFound(err.to_string()),
            StaffError::Validation(msg) => AppError::ValidationError(msg),
            StaffError::Scheduling(e) => e.into(),
            StaffError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

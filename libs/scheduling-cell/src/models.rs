// libs/scheduling-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_database::SupabaseError;
use shared_models::entities::{AppointmentStatus, StaffRole};
use shared_models::error::AppError;

// ==============================================================================
// INTERVALS
// ==============================================================================

/// Closed calendar-day interval; both bounds are part of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ==============================================================================
// ASSIGNMENT PROPOSALS
// ==============================================================================

/// The fields of a staff assignment that scheduling rules look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentProposal {
    pub client_id: i64,
    pub staff_user_id: i64,
    pub role: StaffRole,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AssignmentProposal {
    pub fn interval(&self) -> DateInterval {
        DateInterval::new(self.start_date, self.end_date)
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Client,
    Provider,
    StaffUser,
    Appointment,
    Assignment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Client => write!(f, "Client"),
            EntityKind::Provider => write!(f, "Provider"),
            EntityKind::StaffUser => write!(f, "Staff user"),
            EntityKind::Appointment => write!(f, "Appointment"),
            EntityKind::Assignment => write!(f, "Staff assignment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    #[error("Staff user {staff_user_id} has role {actual}, assignment declares {expected}")]
    RoleMismatch {
        staff_user_id: i64,
        expected: StaffRole,
        actual: StaffRole,
    },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Assignment conflict: {0}")]
    Conflict(String),

    #[error("Inconsistent link: {0}")]
    InconsistentLink(String),

    #[error("Appointment {appointment_id} is {status} and cannot be deleted")]
    DeletionBlocked {
        appointment_id: i64,
        status: AppointmentStatus,
    },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl SchedulingError {
    pub fn not_found(entity: EntityKind, id: i64) -> Self {
        SchedulingError::NotFound { entity, id }
    }

    /// Classifies a failed store write. The exclusion constraint on
    /// `staff_assignments` surfaces here when two requests race past the
    /// overlap scan.
    pub fn from_store_write(err: anyhow::Error) -> Self {
        match SupabaseError::find(&err) {
            Some(store_err) if store_err.is_exclusion_violation() => SchedulingError::Conflict(
                "staff member is already assigned to this client for an overlapping period".to_string(),
            ),
            _ => SchedulingError::Store(err),
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound { .. } => AppError::NotFound(err.to_string()),
            SchedulingError::RoleMismatch { .. } => AppError::ValidationError(err.to_string()),
            SchedulingError::InvalidRange(_) => AppError::ValidationError(err.to_string()),
            SchedulingError::Conflict(_) => AppError::Conflict(err.to_string()),
            SchedulingError::InconsistentLink(_) => AppError::ValidationError(err.to_string()),
            SchedulingError::DeletionBlocked { .. } => AppError::Conflict(err.to_string()),
            SchedulingError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::entities::{Appointment, StaffAssignment};

use crate::models::{AssignmentProposal, DateInterval, EntityKind, SchedulingError};
use crate::services::overlap::first_overlap;
use crate::services::referential::ReferentialValidator;
use crate::services::store::{EntityStore, SupabaseEntityStore};

/// Source of the current calendar day.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct SchedulingValidator {
    store: Arc<dyn EntityStore>,
    referential: ReferentialValidator,
    clock: Clock,
}

impl SchedulingValidator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            referential: ReferentialValidator::new(store.clone()),
            store,
            clock: Arc::new(utc_today),
        }
    }

    pub fn for_config(config: &AppConfig) -> Self {
        Self::new(SupabaseEntityStore::shared(config))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Pins "today" to a fixed day.
    pub fn with_today(self, today: NaiveDate) -> Self {
        self.with_clock(Arc::new(move || today))
    }

    pub fn referential(&self) -> &ReferentialValidator {
        &self.referential
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    // ==========================================================================
    // STAFF ASSIGNMENTS
    // ==========================================================================

    pub async fn validate_new_assignment(&self, proposal: &AssignmentProposal) -> Result<(), SchedulingError> {
        debug!(
            "Validating new assignment: client {} staff {} {}",
            proposal.client_id,
            proposal.staff_user_id,
            proposal.interval()
        );

        self.check_assignment_references(proposal).await?;
        self.check_not_in_past(proposal.start_date)?;
        check_interval(&proposal.interval())?;

        let existing = self
            .store
            .list_assignments_for(proposal.client_id, proposal.staff_user_id)
            .await?;
        check_no_overlap(&proposal.interval(), &existing)?;

        info!(
            "Assignment for client {} / staff {} passed validation",
            proposal.client_id, proposal.staff_user_id
        );
        Ok(())
    }

    /// Same rules as a new assignment with two differences: the record being
    /// edited is left out of the overlap scan, and the past-date rule only
    /// applies when the start date is moved.
    pub async fn validate_updated_assignment(
        &self,
        assignment_id: i64,
        proposal: &AssignmentProposal,
    ) -> Result<(), SchedulingError> {
        debug!("Validating update of assignment {} to {}", assignment_id, proposal.interval());

        self.check_assignment_references(proposal).await?;

        let existing = self
            .store
            .list_assignments_for(proposal.client_id, proposal.staff_user_id)
            .await?;

        let current = existing
            .iter()
            .find(|a| a.id == assignment_id)
            .ok_or_else(|| SchedulingError::not_found(EntityKind::Assignment, assignment_id))?;

        if current.start_date != proposal.start_date {
            self.check_not_in_past(proposal.start_date)?;
        }
        check_interval(&proposal.interval())?;

        let others: Vec<StaffAssignment> = existing
            .iter()
            .filter(|a| a.id != assignment_id)
            .cloned()
            .collect();
        check_no_overlap(&proposal.interval(), &others)?;

        info!("Assignment {} update passed validation", assignment_id);
        Ok(())
    }

    async fn check_assignment_references(&self, proposal: &AssignmentProposal) -> Result<(), SchedulingError> {
        self.referential.require_client(proposal.client_id).await?;
        self.referential
            .require_staff_with_role(proposal.staff_user_id, proposal.role)
            .await?;
        Ok(())
    }

    fn check_not_in_past(&self, start_date: NaiveDate) -> Result<(), SchedulingError> {
        let today = self.today();
        if start_date < today {
            warn!("Rejected start_date {} before {}", start_date, today);
            return Err(SchedulingError::InvalidRange(format!(
                "start_date {} is in the past",
                start_date
            )));
        }
        Ok(())
    }

    // ==========================================================================
    // APPOINTMENTS
    // ==========================================================================

    pub fn validate_appointment_window(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<(), SchedulingError> {
        if start_time >= end_time {
            warn!("Rejected appointment window {} -> {}", start_time, end_time);
            return Err(SchedulingError::InvalidRange(
                "start_time must be before end_time".to_string(),
            ));
        }
        Ok(())
    }

    /// Window plus client/provider existence, as run on appointment create and update.
    pub async fn validate_appointment(
        &self,
        client_id: i64,
        provider_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<(), SchedulingError> {
        Self::validate_appointment_window(start_time, end_time)?;
        self.referential
            .validate_client_provider(Some(client_id), Some(provider_id))
            .await
    }

    pub fn validate_appointment_deletion(appointment: &Appointment) -> Result<(), SchedulingError> {
        if !appointment.status.is_deletable() {
            warn!("Refusing to delete {} appointment {}", appointment.status, appointment.id);
            return Err(SchedulingError::DeletionBlocked {
                appointment_id: appointment.id,
                status: appointment.status,
            });
        }
        Ok(())
    }

    // ==========================================================================
    // RECORDS LINKED TO AN APPOINTMENT
    // ==========================================================================

    pub fn validate_note_appointment_consistency(
        client_id: i64,
        provider_id: i64,
        appointment: &Appointment,
    ) -> Result<(), SchedulingError> {
        if appointment.client_id != client_id {
            return Err(SchedulingError::InconsistentLink(format!(
                "appointment {} belongs to client {}, not {}",
                appointment.id, appointment.client_id, client_id
            )));
        }
        if appointment.provider_id != provider_id {
            return Err(SchedulingError::InconsistentLink(format!(
                "appointment {} is with provider {}, not {}",
                appointment.id, appointment.provider_id, provider_id
            )));
        }
        Ok(())
    }

    /// Loads the appointment a note or telehealth session points at and
    /// checks both parties against it.
    pub async fn validate_appointment_link(
        &self,
        appointment_id: i64,
        client_id: i64,
        provider_id: i64,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self.referential.require_appointment(appointment_id).await?;
        Self::validate_note_appointment_consistency(client_id, provider_id, &appointment)?;
        Ok(appointment)
    }
}

fn check_interval(interval: &DateInterval) -> Result<(), SchedulingError> {
    if !interval.is_well_formed() {
        return Err(SchedulingError::InvalidRange(format!(
            "end_date {} is before start_date {}",
            interval.end, interval.start
        )));
    }
    Ok(())
}

fn check_no_overlap(candidate: &DateInterval, existing: &[StaffAssignment]) -> Result<(), SchedulingError> {
    let clash = first_overlap(candidate, existing, |a| DateInterval::new(a.start_date, a.end_date));

    match clash {
        Some(other) => {
            warn!("Assignment {} overlaps existing assignment {}", candidate, other.id);
            Err(SchedulingError::Conflict(format!(
                "overlaps assignment {} ({} to {})",
                other.id, other.start_date, other.end_date
            )))
        }
        None => Ok(()),
    }
}

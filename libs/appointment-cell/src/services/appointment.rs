use std::sync::Arc;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use serde_json::json;
use tracing::{debug, info};

use scheduling_cell::{SchedulingError, SchedulingValidator};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::entities::{Appointment, AppointmentStatus};

use crate::models::{
    appointment_update_body, group_by_day, AppointmentError, AppointmentPatch, AppointmentQuery,
    CalendarView, CreateAppointmentRequest,
};

pub struct AppointmentService {
    supabase: Arc<SupabaseClient>,
    validator: SchedulingValidator,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            validator: SchedulingValidator::for_config(config),
        }
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.validator
            .validate_appointment(
                request.client_id,
                request.provider_id,
                request.start_time,
                request.end_time,
            )
            .await?;

        let body = json!({
            "client_id": request.client_id,
            "provider_id": request.provider_id,
            "start_time": request.start_time.to_rfc3339(),
            "end_time": request.end_time.to_rfc3339(),
            "type": request.appointment_type,
            "status": request.status.unwrap_or_default(),
            "location": request.location,
        });

        let appointment: Appointment = self.supabase.insert("appointments", body).await?;
        info!(
            "Appointment {} booked for client {} with provider {}",
            appointment.id, appointment.client_id, appointment.provider_id
        );
        Ok(appointment)
    }

    pub async fn list_appointments(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>> {
        let mut filters = vec!["order=start_time.asc".to_string()];
        if let Some(client_id) = query.client_id {
            filters.push(format!("client_id=eq.{}", client_id));
        }
        if let Some(provider_id) = query.provider_id {
            filters.push(format!("provider_id=eq.{}", provider_id));
        }
        if let Some(status) = query.status {
            filters.push(format!("status=eq.{}", status));
        }

        self.supabase.select("appointments", &filters.join("&")).await
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.supabase
            .select_one("appointments", &format!("id=eq.{}", appointment_id))
            .await?
            .ok_or(AppointmentError::NotFound(appointment_id))
    }

    /// Merges the patch, then re-runs the same checks a new booking gets.
    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        patch: AppointmentPatch,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.get_appointment(appointment_id).await?;
        patch.apply_to(&mut appointment)?;

        self.validator
            .validate_appointment(
                appointment.client_id,
                appointment.provider_id,
                appointment.start_time,
                appointment.end_time,
            )
            .await?;

        let updated: Option<Appointment> = self
            .supabase
            .patch(
                "appointments",
                &format!("id=eq.{}", appointment_id),
                appointment_update_body(&appointment),
            )
            .await?;

        let updated = updated.ok_or(AppointmentError::NotFound(appointment_id))?;
        info!("Appointment {} updated", appointment_id);
        Ok(updated)
    }

    /// The DELETE also filters on status, so the store enforces the guard.
    pub async fn delete_appointment(&self, appointment_id: i64) -> Result<AppointmentStatus, AppointmentError> {
        let appointment = self.get_appointment(appointment_id).await?;
        SchedulingValidator::validate_appointment_deletion(&appointment)?;

        let removed = self
            .supabase
            .delete(
                "appointments",
                &format!("id=eq.{}&status=neq.{}", appointment_id, AppointmentStatus::Completed),
            )
            .await?;
        if removed == 0 {
            let current = self.get_appointment(appointment_id).await?;
            SchedulingValidator::validate_appointment_deletion(&current)?;
            return Err(AppointmentError::NotFound(appointment_id));
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(appointment.status)
    }

    /// Appointments starting between `start` 00:00 and the end of `end`, grouped per day.
    pub async fn calendar(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        provider_id: Option<i64>,
    ) -> Result<CalendarView, AppointmentError> {
        if end < start {
            return Err(SchedulingError::InvalidRange("end must not be before start".to_string()).into());
        }
        let after_end = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| anyhow::anyhow!("calendar end {} out of range", end))?;

        let mut query = format!(
            "order=start_time.asc&start_time=gte.{}T00:00:00Z&start_time=lt.{}T00:00:00Z",
            start, after_end
        );
        if let Some(provider_id) = provider_id {
            query.push_str(&format!("&provider_id=eq.{}", provider_id));
        }
        debug!("Calendar query: {}", query);

        let appointments: Vec<Appointment> = self.supabase.select("appointments", &query).await?;
        Ok(group_by_day(appointments))
    }
}

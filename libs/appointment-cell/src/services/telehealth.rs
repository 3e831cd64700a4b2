use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::info;

use scheduling_cell::SchedulingValidator;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::entities::TelehealthSession;

use crate::models::{join_url, AppointmentError, CreateTelehealthSessionRequest};

pub struct TelehealthService {
    supabase: Arc<SupabaseClient>,
    validator: SchedulingValidator,
    base_url: String,
}

impl TelehealthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            validator: SchedulingValidator::for_config(config),
            base_url: config.telehealth_base_url.clone(),
        }
    }

    /// Client and provider default to the appointment's; when the caller
    /// names them they must agree with it.
    pub async fn create_session(
        &self,
        request: CreateTelehealthSessionRequest,
    ) -> Result<TelehealthSession, AppointmentError> {
        let appointment = self
            .validator
            .referential()
            .require_appointment(request.appointment_id)
            .await?;

        let client_id = request.client_id.unwrap_or(appointment.client_id);
        let provider_id = request.provider_id.unwrap_or(appointment.provider_id);
        SchedulingValidator::validate_note_appointment_consistency(client_id, provider_id, &appointment)?;

        let body = json!({
            "appointment_id": appointment.id,
            "client_id": client_id,
            "provider_id": provider_id,
            "join_url": join_url(&self.base_url, appointment.id),
            "start_time": request.start_time.unwrap_or(appointment.start_time).to_rfc3339(),
            "status": request.status.unwrap_or_default(),
        });

        let session: TelehealthSession = self.supabase.insert("telehealth_sessions", body).await?;
        info!("Telehealth session {} opened for appointment {}", session.id, appointment.id);
        Ok(session)
    }

    pub async fn list_sessions(&self) -> Result<Vec<TelehealthSession>> {
        self.supabase
            .select("telehealth_sessions", "order=start_time.desc")
            .await
    }
}

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use scheduling_cell::SchedulingValidator;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::entities::ProgressNote;

use crate::models::{ClinicalError, CreateProgressNoteRequest};

pub struct NoteService {
    supabase: Arc<SupabaseClient>,
    validator: SchedulingValidator,
}

impl NoteService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            validator: SchedulingValidator::for_config(config),
        }
    }

    pub async fn create_note(&self, request: CreateProgressNoteRequest) -> Result<ProgressNote, ClinicalError> {
        if request.note_text.trim().is_empty() {
            return Err(ClinicalError::Validation("note_text is required".to_string()));
        }

        self.validator
            .referential()
            .validate_client_provider(Some(request.client_id), Some(request.provider_id))
            .await?;

        if let Some(appointment_id) = request.appointment_id {
            debug!("Checking note against appointment {}", appointment_id);
            self.validator
                .validate_appointment_link(appointment_id, request.client_id, request.provider_id)
                .await?;
        }

        let body = json!({
            "client_id": request.client_id,
            "provider_id": request.provider_id,
            "appointment_id": request.appointment_id,
            "note_text": request.note_text,
            "dsm5_code": request.dsm5_code,
            "modifiers": request.modifiers,
            "service_line": request.service_line,
            "created_at": Utc::now().to_rfc3339(),
        });

        let note: ProgressNote = self.supabase.insert("progress_notes", body).await?;
        info!("Progress note {} written for client {}", note.id, note.client_id);
        Ok(note)
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<ProgressNote>> {
        self.supabase
            .select(
                "progress_notes",
                &format!("client_id=eq.{}&order=created_at.desc", client_id),
            )
            .await
    }
}

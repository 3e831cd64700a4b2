use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{ClientError, CreateReminderRequest, Reminder};

pub struct ReminderService {
    supabase: Arc<SupabaseClient>,
}

impl ReminderService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn create_reminder(&self, request: CreateReminderRequest) -> Result<Reminder, ClientError> {
        if request.reminder_text.trim().is_empty() {
            return Err(ClientError::Validation("reminder_text is required".to_string()));
        }

        let reminder = self
            .supabase
            .insert(
                "reminder_logs",
                json!({
                    "client_id": request.client_id,
                    "reminder_type": request.reminder_type,
                    "reminder_text": request.reminder_text,
                    "due_date": request.due_date.map(|d| d.to_rfc3339()),
                    "completed": false,
                }),
            )
            .await?;
        Ok(reminder)
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<Reminder>> {
        self.supabase
            .select(
                "reminder_logs",
                &format!("client_id=eq.{}&order=due_date.asc.nullslast", client_id),
            )
            .await
    }

    /// Idempotent: completing twice keeps the first completion time.
    pub async fn complete_reminder(&self, reminder_id: i64) -> Result<Reminder, ClientError> {
        let reminder: Reminder = self
            .supabase
            .select_one("reminder_logs", &format!("id=eq.{}", reminder_id))
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("Reminder {}", reminder_id)))?;

        if reminder.completed {
            return Ok(reminder);
        }

        let updated: Option<Reminder> = self
            .supabase
            .patch(
                "reminder_logs",
                &format!("id=eq.{}", reminder_id),
                json!({ "completed": true, "completed_at": Utc::now().to_rfc3339() }),
            )
            .await?;

        updated.ok_or_else(|| ClientError::NotFound(format!("Reminder {}", reminder_id)))
    }
}

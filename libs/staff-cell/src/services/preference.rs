use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{debug, info};

use scheduling_cell::{EntityKind, ReferentialValidator};
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{SetPreferenceRequest, StaffError, StaffPreference};

pub struct PreferenceService {
    supabase: Arc<SupabaseClient>,
    referential: ReferentialValidator,
}

impl PreferenceService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            referential: ReferentialValidator::for_config(config),
        }
    }

    /// One value per (user, key): overwrites the stored value when the key
    /// exists, inserts otherwise.
    pub async fn set_preference(&self, request: SetPreferenceRequest) -> Result<StaffPreference, StaffError> {
        let key = request.key.trim();
        if key.is_empty() {
            return Err(StaffError::Validation("key is required".to_string()));
        }
        self.referential
            .require_staff(request.user_id, EntityKind::StaffUser)
            .await?;

        let filter = format!(
            "user_id=eq.{}&key=eq.{}",
            request.user_id,
            urlencoding::encode(key)
        );
        let existing: Option<StaffPreference> = self.supabase.select_one("staff_preferences", &filter).await?;

        match existing {
            Some(existing) => {
                debug!("Overwriting preference {} for user {}", key, request.user_id);
                let updated: Option<StaffPreference> = self
                    .supabase
                    .patch(
                        "staff_preferences",
                        &format!("id=eq.{}", existing.id),
                        json!({ "value": request.value }),
                    )
                    .await?;

                Ok(updated.ok_or_else(|| anyhow!("Preference {} vanished during update", existing.id))?)
            }
            None => {
                let created: StaffPreference = self
                    .supabase
                    .insert(
                        "staff_preferences",
                        json!({ "user_id": request.user_id, "key": key, "value": request.value }),
                    )
                    .await?;

                info!("Preference {} set for user {}", key, request.user_id);
                Ok(created)
            }
        }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<StaffPreference>> {
        self.supabase
            .select("staff_preferences", &format!("user_id=eq.{}&order=key.asc", user_id))
            .await
    }
}

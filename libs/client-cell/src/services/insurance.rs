use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{InsuranceInfo, UpsertInsuranceRequest};

pub struct InsuranceService {
    supabase: Arc<SupabaseClient>,
}

impl InsuranceService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn get_for_client(&self, client_id: i64) -> Result<Option<InsuranceInfo>> {
        self.supabase
            .select_one("insurance_info", &format!("client_id=eq.{}", client_id))
            .await
    }

    /// One insurance row per client: merges onto the existing row when
    /// there is one, inserts otherwise.
    pub async fn upsert(&self, request: UpsertInsuranceRequest) -> Result<InsuranceInfo> {
        let fields = request.present_fields();

        match self.get_for_client(request.client_id).await? {
            Some(existing) => {
                debug!("Merging {} insurance fields for client {}", fields.len(), request.client_id);
                if fields.is_empty() {
                    return Ok(existing);
                }

                let updated: Option<InsuranceInfo> = self
                    .supabase
                    .patch(
                        "insurance_info",
                        &format!("id=eq.{}", existing.id),
                        Value::Object(fields),
                    )
                    .await?;

                updated.ok_or_else(|| anyhow!("Insurance row {} vanished during update", existing.id))
            }
            None => {
                let mut body = fields;
                body.insert("client_id".to_string(), json!(request.client_id));

                let created: InsuranceInfo = self
                    .supabase
                    .insert("insurance_info", Value::Object(body))
                    .await?;

                info!("Insurance recorded for client {}", request.client_id);
                Ok(created)
            }
        }
    }
}

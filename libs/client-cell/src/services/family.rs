use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{CreateFamilyContactRequest, FamilyContact};

pub struct FamilyContactService {
    supabase: Arc<SupabaseClient>,
}

impl FamilyContactService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn create_contact(&self, request: CreateFamilyContactRequest) -> Result<FamilyContact> {
        debug!("Adding family contact for client {}", request.client_id);

        self.supabase
            .insert(
                "family_contacts",
                json!({
                    "client_id": request.client_id,
                    "name": request.name,
                    "relationships": request.relationships,
                    "phone": request.phone,
                    "email": request.email,
                    "notes": request.notes,
                }),
            )
            .await
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<FamilyContact>> {
        self.supabase
            .select("family_contacts", &format!("client_id=eq.{}&order=id.asc", client_id))
            .await
    }
}

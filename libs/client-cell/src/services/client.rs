use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::entities::Client;

use crate::models::{client_update_body, ClientError, ClientPatch, CreateClientRequest};

pub struct ClientService {
    supabase: Arc<SupabaseClient>,
}

/// Strips characters PostgREST treats as filter syntax inside `or=(...)`.
pub fn search_term(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '.'))
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(urlencoding::encode(&cleaned).into_owned())
    }
}

impl ClientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn create_client(&self, request: CreateClientRequest) -> Result<Client, ClientError> {
        request.validate()?;
        debug!("Creating client {} {}", request.first_name, request.last_name);

        let body = json!({
            "first_name": request.first_name.trim(),
            "last_name": request.last_name.trim(),
            "date_of_birth": request.date_of_birth,
            "email": request.email,
            "phone": request.phone,
            "address": request.address,
            "emergency_contact_name": request.emergency_contact_name,
            "emergency_contact_phone": request.emergency_contact_phone,
            "created_at": Utc::now().to_rfc3339(),
        });

        let client: Client = self.supabase.insert("clients", body).await?;
        info!("Client {} created", client.id);
        Ok(client)
    }

    pub async fn list_clients(&self, search: Option<&str>) -> Result<Vec<Client>> {
        let mut query = "order=last_name.asc,first_name.asc".to_string();

        if let Some(term) = search.and_then(search_term) {
            query.push_str(&format!(
                "&or=(first_name.ilike.*{term}*,last_name.ilike.*{term}*)",
                term = term
            ));
        }

        self.supabase.select("clients", &query).await
    }

    pub async fn get_client(&self, client_id: i64) -> Result<Client, ClientError> {
        self.supabase
            .select_one("clients", &format!("id=eq.{}", client_id))
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("Client {}", client_id)))
    }

    pub async fn update_client(&self, client_id: i64, patch: ClientPatch) -> Result<Client, ClientError> {
        let mut client = self.get_client(client_id).await?;
        patch.apply_to(&mut client);

        if client.first_name.trim().is_empty() || client.last_name.trim().is_empty() {
            return Err(ClientError::Validation("names cannot be blank".to_string()));
        }

        let updated: Option<Client> = self
            .supabase
            .patch("clients", &format!("id=eq.{}", client_id), client_update_body(&client))
            .await?;

        updated.ok_or_else(|| ClientError::NotFound(format!("Client {}", client_id)))
    }

    /// Hard delete; dependent rows go with it through `ON DELETE CASCADE`.
    pub async fn delete_client(&self, client_id: i64) -> Result<(), ClientError> {
        let removed = self
            .supabase
            .delete("clients", &format!("id=eq.{}", client_id))
            .await?;

        if removed == 0 {
            return Err(ClientError::NotFound(format!("Client {}", client_id)));
        }

        info!("Client {} deleted", client_id);
        Ok(())
    }
}

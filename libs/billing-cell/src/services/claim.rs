use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use scheduling_cell::{ReferentialValidator, SchedulingError};
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{validate_amount, BillingError, Claim, CreateClaimRequest};

pub struct ClaimService {
    supabase: Arc<SupabaseClient>,
    referential: ReferentialValidator,
}

impl ClaimService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            referential: ReferentialValidator::for_config(config),
        }
    }

    pub async fn create_claim(&self, request: CreateClaimRequest) -> Result<Claim, BillingError> {
        validate_amount("amount", request.amount)?;
        if request.payer_name.trim().is_empty() {
            return Err(BillingError::Validation("payer_name is required".to_string()));
        }

        self.referential.require_client(request.client_id).await?;

        if let Some(appointment_id) = request.appointment_id {
            let appointment = self.referential.require_appointment(appointment_id).await?;
            if appointment.client_id != request.client_id {
                return Err(SchedulingError::InconsistentLink(format!(
                    "appointment {} belongs to client {}, not {}",
                    appointment.id, appointment.client_id, request.client_id
                ))
                .into());
            }
            debug!("Claim linked to appointment {}", appointment_id);
        }

        let body = json!({
            "client_id": request.client_id,
            "appointment_id": request.appointment_id,
            "payer_name": request.payer_name.trim(),
            "status": request.status,
            "amount": request.amount,
            "claim_number": request.claim_number,
            "created_at": Utc::now().to_rfc3339(),
        });

        let claim: Claim = self.supabase.insert("claims", body).await?;
        info!("Claim {} recorded for client {} against {}", claim.id, claim.client_id, claim.payer_name);
        Ok(claim)
    }

    pub async fn list_claims(&self, client_id: Option<i64>) -> Result<Vec<Claim>> {
        let mut query = "order=created_at.desc".to_string();
        if let Some(client_id) = client_id {
            query.push_str(&format!("&client_id=eq.{}", client_id));
        }
        self.supabase.select("claims", &query).await
    }
}

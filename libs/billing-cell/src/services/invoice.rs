use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use scheduling_cell::ReferentialValidator;
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{validate_amount, BillingError, CreateInvoiceRequest, Invoice};

pub struct InvoiceService {
    supabase: Arc<SupabaseClient>,
    referential: ReferentialValidator,
}

impl InvoiceService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            referential: ReferentialValidator::for_config(config),
        }
    }

    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<Invoice, BillingError> {
        validate_amount("total_amount", request.total_amount)?;
        self.referential.require_client(request.client_id).await?;

        let body = json!({
            "client_id": request.client_id,
            "total_amount": request.total_amount,
            "status": request.status,
            "description": request.description,
            "bill_to_name": request.bill_to_name,
            "bill_to_relationship": request.bill_to_relationship,
            "created_at": Utc::now().to_rfc3339(),
        });

        let invoice: Invoice = self.supabase.insert("invoices", body).await?;
        info!("Invoice {} issued to client {} for {:.2}", invoice.id, invoice.client_id, invoice.total_amount);
        Ok(invoice)
    }

    pub async fn list_invoices(&self, client_id: Option<i64>) -> Result<Vec<Invoice>> {
        let mut query = "order=created_at.desc".to_string();
        if let Some(client_id) = client_id {
            query.push_str(&format!("&client_id=eq.{}", client_id));
        }
        self.supabase.select("invoices", &query).await
    }
}

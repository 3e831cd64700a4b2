use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scheduling_cell::SchedulingError;
use shared_models::error::AppError;

// ==============================================================================
// INVOICES
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Void,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub client_id: i64,
    pub total_amount: f64,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub description: Option<String>,
    pub bill_to_name: Option<String>,
    pub bill_to_relationship: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_id: i64,
    pub total_amount: f64,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub description: Option<String>,
    pub bill_to_name: Option<String>,
    pub bill_to_relationship: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingQuery {
    pub client_id: Option<i64>,
}

// ==============================================================================
// CLAIMS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Draft,
    Submitted,
    Paid,
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claim {
    pub id: i64,
    pub client_id: i64,
    pub appointment_id: Option<i64>,
    pub payer_name: String,
    #[serde(default)]
    pub status: ClaimStatus,
    pub amount: f64,
    pub claim_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClaimRequest {
    pub client_id: i64,
    pub appointment_id: Option<i64>,
    pub payer_name: String,
    #[serde(default)]
    pub status: ClaimStatus,
    pub amount: f64,
    pub claim_number: Option<String>,
}

/// Amounts must be finite and strictly positive.
pub fn validate_amount(field: &str, amount: f64) -> Result<(), BillingError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BillingError::Validation(format!("{} must be greater than zero", field)));
    }
    Ok(())
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Validation(msg) => AppError::ValidationError(msg),
            BillingError::Scheduling(e) => e.into(),
            BillingError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_amount_validation() {
        assert_matches!(validate_amount("total_amount", 120.5), Ok(()));
        assert_matches!(validate_amount("total_amount", 0.0), Err(BillingError::Validation(_)));
        assert_matches!(validate_amount("amount", -3.0), Err(BillingError::Validation(_)));
        assert_matches!(validate_amount("amount", f64::NAN), Err(BillingError::Validation(_)));
    }

    #[test]
    fn test_statuses_default_on_create() {
        let request: CreateClaimRequest = serde_json::from_value(serde_json::json!({
            "client_id": 1, "payer_name": "Acme Health", "amount": 80.0
        }))
        .unwrap();
        assert_eq!(request.status, ClaimStatus::Draft);

        let request: CreateInvoiceRequest = serde_json::from_value(serde_json::json!({
            "client_id": 1, "total_amount": 80.0
        }))
        .unwrap();
        assert_eq!(request.status, InvoiceStatus::Pending);
    }
}

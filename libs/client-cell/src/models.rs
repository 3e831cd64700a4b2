use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use scheduling_cell::SchedulingError;
use shared_models::entities::Client;
use shared_models::error::AppError;

// ==============================================================================
// CLIENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

impl CreateClientRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ClientError::Validation(
                "first_name and last_name are required".to_string(),
            ));
        }
        if let Some(dob) = self.date_of_birth {
            if dob > Utc::now().date_naive() {
                return Err(ClientError::Validation(
                    "date_of_birth cannot be in the future".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Partial update of a client; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

impl ClientPatch {
    pub fn apply_to(self, client: &mut Client) {
        if let Some(v) = self.first_name {
            client.first_name = v;
        }
        if let Some(v) = self.last_name {
            client.last_name = v;
        }
        if let Some(v) = self.date_of_birth {
            client.date_of_birth = Some(v);
        }
        if let Some(v) = self.email {
            client.email = Some(v);
        }
        if let Some(v) = self.phone {
            client.phone = Some(v);
        }
        if let Some(v) = self.address {
            client.address = Some(v);
        }
        if let Some(v) = self.emergency_contact_name {
            client.emergency_contact_name = Some(v);
        }
        if let Some(v) = self.emergency_contact_phone {
            client.emergency_contact_phone = Some(v);
        }
    }
}

/// Columns written back after a merge; `id` and `created_at` never change.
pub fn client_update_body(client: &Client) -> Value {
    json!({
        "first_name": client.first_name,
        "last_name": client.last_name,
        "date_of_birth": client.date_of_birth,
        "email": client.email,
        "phone": client.phone,
        "address": client.address,
        "emergency_contact_name": client.emergency_contact_name,
        "emergency_contact_phone": client.emergency_contact_phone,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSearchQuery {
    pub search: Option<String>,
}

// ==============================================================================
// FAMILY CONTACTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilyContact {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub relationships: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFamilyContactRequest {
    pub client_id: i64,
    pub name: String,
    pub relationships: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

// ==============================================================================
// INSURANCE
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsuranceInfo {
    pub id: i64,
    pub client_id: i64,
    pub primary_payer_name: Option<String>,
    pub primary_member_id: Option<String>,
    pub primary_group_id: Option<String>,
    pub primary_plan_name: Option<String>,
    pub primary_relationship: Option<String>,
    pub secondary_payer_name: Option<String>,
    pub secondary_member_id: Option<String>,
    pub secondary_group_id: Option<String>,
    pub secondary_plan_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertInsuranceRequest {
    pub client_id: i64,
    pub primary_payer_name: Option<String>,
    pub primary_member_id: Option<String>,
    pub primary_group_id: Option<String>,
    pub primary_plan_name: Option<String>,
    pub primary_relationship: Option<String>,
    pub secondary_payer_name: Option<String>,
    pub secondary_member_id: Option<String>,
    pub secondary_group_id: Option<String>,
    pub secondary_plan_name: Option<String>,
    pub notes: Option<String>,
}

impl UpsertInsuranceRequest {
    /// Only the fields the caller sent, for merging onto an existing row.
    pub fn present_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        let candidates = [
            ("primary_payer_name", &self.primary_payer_name),
            ("primary_member_id", &self.primary_member_id),
            ("primary_group_id", &self.primary_group_id),
            ("primary_plan_name", &self.primary_plan_name),
            ("primary_relationship", &self.primary_relationship),
            ("secondary_payer_name", &self.secondary_payer_name),
            ("secondary_member_id", &self.secondary_member_id),
            ("secondary_group_id", &self.secondary_group_id),
            ("secondary_plan_name", &self.secondary_plan_name),
            ("notes", &self.notes),
        ];
        for (column, value) in candidates {
            if let Some(v) = value {
                fields.insert(column.to_string(), json!(v));
            }
        }
        fields
    }
}

// ==============================================================================
// DOCUMENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: i64,
    pub client_id: i64,
    pub document_type: String,
    pub title: String,
    pub file_path: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by_user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    pub client_id: i64,
    pub document_type: String,
    pub title: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentSearchQuery {
    pub search: Option<String>,
}

// ==============================================================================
// REMINDERS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: i64,
    pub client_id: i64,
    pub reminder_type: Option<String>,
    pub reminder_text: String,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub client_id: i64,
    pub reminder_type: Option<String>,
    pub reminder_text: String,
    pub due_date: Option<DateTime<Utc>>,
}

// ==============================================================================
// DASHBOARD
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardCounts {
    pub clients_count: u64,
    pub appointments_count: u64,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_) => AppError::NotFound(err.to_string()),
            ClientError::Validation(msg) => AppError::ValidationError(msg),
            ClientError::Scheduling(e) => e.into(),
            ClientError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

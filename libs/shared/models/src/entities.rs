// libs/shared/models/src/entities.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==============================================================================
// CLIENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ==============================================================================
// STAFF
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Provider,
    Admin,
    Billing,
    Peer,
    Waads,
    Dahs,
}

impl StaffRole {
    pub const ALL: [StaffRole; 6] = [
        StaffRole::Provider,
        StaffRole::Admin,
        StaffRole::Billing,
        StaffRole::Peer,
        StaffRole::Waads,
        StaffRole::Dahs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Provider => "provider",
            StaffRole::Admin => "admin",
            StaffRole::Billing => "billing",
            StaffRole::Peer => "peer",
            StaffRole::Waads => "waads",
            StaffRole::Dahs => "dahs",
        }
    }
}

impl Default for StaffRole {
    fn default() -> Self {
        StaffRole::Provider
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaffRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = StaffRole::ALL.iter().map(|r| r.as_str()).collect();
                format!("Invalid role. Allowed roles: {}", allowed.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: StaffRole,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffAssignment {
    pub id: i64,
    pub client_id: i64,
    pub staff_user_id: i64,
    pub role: StaffRole,
    pub is_primary: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Canceled,
    NoShow,
}

impl AppointmentStatus {
    /// Completed visits are part of the clinical record and stay put.
    pub fn is_deletable(&self) -> bool {
        !matches!(self, AppointmentStatus::Completed)
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Canceled => write!(f, "canceled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Individual,
    Group,
    Telehealth,
    Waads,
    Dahs,
    Peer,
}

impl Default for AppointmentType {
    fn default() -> Self {
        AppointmentType::Individual
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentType::Individual => write!(f, "individual"),
            AppointmentType::Group => write!(f, "group"),
            AppointmentType::Telehealth => write!(f, "telehealth"),
            AppointmentType::Waads => write!(f, "waads"),
            AppointmentType::Dahs => write!(f, "dahs"),
            AppointmentType::Peer => write!(f, "peer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub provider_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub appointment_type: AppointmentType,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub location: Option<String>,
}

// ==============================================================================
// CLINICAL RECORDS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressNote {
    pub id: i64,
    pub client_id: i64,
    pub provider_id: i64,
    pub appointment_id: Option<i64>,
    pub note_text: String,
    pub dsm5_code: Option<String>,
    pub modifiers: Option<String>,
    pub service_line: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TelehealthStatus {
    Scheduled,
    Live,
    Completed,
}

impl Default for TelehealthStatus {
    fn default() -> Self {
        TelehealthStatus::Scheduled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelehealthSession {
    pub id: i64,
    pub appointment_id: i64,
    pub provider_id: i64,
    pub client_id: i64,
    pub join_url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TelehealthStatus,
}

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::entities::{Appointment, Client, StaffAssignment, StaffUser};

/// Read access the scheduling rules need from persistence.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_client(&self, client_id: i64) -> Result<Option<Client>>;

    async fn get_staff_user(&self, staff_user_id: i64) -> Result<Option<StaffUser>>;

    /// Every assignment recorded for the pair, in no particular order.
    async fn list_assignments_for(&self, client_id: i64, staff_user_id: i64) -> Result<Vec<StaffAssignment>>;

    async fn get_appointment(&self, appointment_id: i64) -> Result<Option<Appointment>>;
}

pub const STAFF_USER_COLUMNS: &str = "id,email,full_name,role,is_active";

pub struct SupabaseEntityStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseEntityStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub fn shared(config: &AppConfig) -> Arc<dyn EntityStore> {
        Arc::new(Self::new(Arc::new(SupabaseClient::new(config))))
    }
}

#[async_trait]
impl EntityStore for SupabaseEntityStore {
    async fn get_client(&self, client_id: i64) -> Result<Option<Client>> {
        debug!("Looking up client {}", client_id);
        self.supabase
            .select_one("clients", &format!("id=eq.{}", client_id))
            .await
    }

    async fn get_staff_user(&self, staff_user_id: i64) -> Result<Option<StaffUser>> {
        debug!("Looking up staff user {}", staff_user_id);
        self.supabase
            .select_one(
                "users",
                &format!("id=eq.{}&select={}", staff_user_id, STAFF_USER_COLUMNS),
            )
            .await
    }

    async fn list_assignments_for(&self, client_id: i64, staff_user_id: i64) -> Result<Vec<StaffAssignment>> {
        debug!("Listing assignments for client {} / staff {}", client_id, staff_user_id);
        self.supabase
            .select(
                "staff_assignments",
                &format!(
                    "client_id=eq.{}&staff_user_id=eq.{}&order=start_date.asc",
                    client_id, staff_user_id
                ),
            )
            .await
    }

    async fn get_appointment(&self, appointment_id: i64) -> Result<Option<Appointment>> {
        debug!("Looking up appointment {}", appointment_id);
        self.supabase
            .select_one("appointments", &format!("id=eq.{}", appointment_id))
            .await
    }
}

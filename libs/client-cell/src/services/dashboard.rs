use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::DashboardCounts;

pub struct DashboardService {
    supabase: Arc<SupabaseClient>,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn counts(&self) -> Result<DashboardCounts> {
        let clients_count = self.supabase.count("clients", "").await?;
        let appointments_count = self.supabase.count("appointments", "").await?;
        debug!("Dashboard: {} clients, {} appointments", clients_count, appointments_count);

        Ok(DashboardCounts {
            clients_count,
            appointments_count,
        })
    }
}

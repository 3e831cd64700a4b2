use std::sync::Arc;

use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::entities::{Appointment, Client, StaffRole, StaffUser};

use crate::models::{EntityKind, SchedulingError};
use crate::services::store::{EntityStore, SupabaseEntityStore};

/// Confirms that ids handed to a write actually name stored records.
pub struct ReferentialValidator {
    store: Arc<dyn EntityStore>,
}

impl ReferentialValidator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn for_config(config: &AppConfig) -> Self {
        Self::new(SupabaseEntityStore::shared(config))
    }

    pub async fn require_client(&self, client_id: i64) -> Result<Client, SchedulingError> {
        self.store
            .get_client(client_id)
            .await?
            .ok_or_else(|| {
                warn!("Client {} does not exist", client_id);
                SchedulingError::not_found(EntityKind::Client, client_id)
            })
    }

    /// `kind` only affects the error wording; providers and other staff
    /// share the users table.
    pub async fn require_staff(&self, staff_user_id: i64, kind: EntityKind) -> Result<StaffUser, SchedulingError> {
        self.store
            .get_staff_user(staff_user_id)
            .await?
            .ok_or_else(|| {
                warn!("{} {} does not exist", kind, staff_user_id);
                SchedulingError::not_found(kind, staff_user_id)
            })
    }

    pub async fn require_staff_with_role(
        &self,
        staff_user_id: i64,
        expected: StaffRole,
    ) -> Result<StaffUser, SchedulingError> {
        let staff = self.require_staff(staff_user_id, EntityKind::StaffUser).await?;

        if staff.role != expected {
            warn!(
                "Role mismatch for staff {}: stored {}, declared {}",
                staff_user_id, staff.role, expected
            );
            return Err(SchedulingError::RoleMismatch {
                staff_user_id,
                expected,
                actual: staff.role,
            });
        }

        Ok(staff)
    }

    pub async fn require_appointment(&self, appointment_id: i64) -> Result<Appointment, SchedulingError> {
        self.store
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::not_found(EntityKind::Appointment, appointment_id))
    }

    /// Checks whichever of the two ids are present. Client first, so a
    /// request naming two missing records reports the client.
    pub async fn validate_client_provider(
        &self,
        client_id: Option<i64>,
        provider_id: Option<i64>,
    ) -> Result<(), SchedulingError> {
        if let Some(id) = client_id {
            self.require_client(id).await?;
        }
        if let Some(id) = provider_id {
            self.require_staff(id, EntityKind::Provider).await?;
        }

        debug!("References ok (client {:?}, provider {:?})", client_id, provider_id);
        Ok(())
    }
}

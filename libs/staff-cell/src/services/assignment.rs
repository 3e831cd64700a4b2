use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::info;

use scheduling_cell::{SchedulingError, SchedulingValidator};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::entities::StaffAssignment;

use crate::models::{
    assignment_update_body, proposal_for, AssignmentPatch, CreateAssignmentRequest, StaffError,
};

pub struct AssignmentService {
    supabase: Arc<SupabaseClient>,
    validator: SchedulingValidator,
}

impl AssignmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            validator: SchedulingValidator::for_config(config),
        }
    }

    pub async fn create_assignment(&self, request: CreateAssignmentRequest) -> Result<StaffAssignment, StaffError> {
        self.validator.validate_new_assignment(&request.proposal()).await?;

        let body = json!({
            "client_id": request.client_id,
            "staff_user_id": request.staff_user_id,
            "role": request.role,
            "is_primary": request.is_primary,
            "start_date": request.start_date,
            "end_date": request.end_date,
            "notes": request.notes,
        });

        let assignment: StaffAssignment = self
            .supabase
            .insert("staff_assignments", body)
            .await
            .map_err(SchedulingError::from_store_write)?;

        info!(
            "Staff {} assigned to client {} as {} ({} to {})",
            assignment.staff_user_id,
            assignment.client_id,
            assignment.role,
            assignment.start_date,
            assignment.end_date
        );
        Ok(assignment)
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<StaffAssignment>> {
        self.supabase
            .select(
                "staff_assignments",
                &format!("client_id=eq.{}&order=start_date.asc", client_id),
            )
            .await
    }

    pub async fn get_assignment(&self, assignment_id: i64) -> Result<StaffAssignment, StaffError> {
        self.supabase
            .select_one("staff_assignments", &format!("id=eq.{}", assignment_id))
            .await?
            .ok_or_else(|| StaffError::NotFound(format!("Staff assignment {}", assignment_id)))
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        patch: AssignmentPatch,
    ) -> Result<StaffAssignment, StaffError> {
        let mut assignment = self.get_assignment(assignment_id).await?;
        patch.apply_to(&mut assignment)?;

        self.validator
            .validate_updated_assignment(assignment_id, &proposal_for(&assignment))
            .await?;

        let updated: Option<StaffAssignment> = self
            .supabase
            .patch(
                "staff_assignments",
                &format!("id=eq.{}", assignment_id),
                assignment_update_body(&assignment),
            )
            .await
            .map_err(SchedulingError::from_store_write)?;

        let updated =
            updated.ok_or_else(|| StaffError::NotFound(format!("Staff assignment {}", assignment_id)))?;
        info!("Staff assignment {} updated", assignment_id);
        Ok(updated)
    }

    pub async fn delete_assignment(&self, assignment_id: i64) -> Result<(), StaffError> {
        let removed = self
            .supabase
            .delete("staff_assignments", &format!("id=eq.{}", assignment_id))
            .await?;

        if removed == 0 {
            return Err(StaffError::NotFound(format!("Staff assignment {}", assignment_id)));
        }

        info!("Staff assignment {} removed", assignment_id);
        Ok(())
    }
}

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::info;

use scheduling_cell::services::consistency::utc_today;
use scheduling_cell::ReferentialValidator;
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{ClinicalError, CreateAssessmentRequest, InitialAssessment};

pub struct AssessmentService {
    supabase: Arc<SupabaseClient>,
    referential: ReferentialValidator,
}

impl AssessmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            referential: ReferentialValidator::for_config(config),
        }
    }

    pub async fn create_assessment(
        &self,
        request: CreateAssessmentRequest,
    ) -> Result<InitialAssessment, ClinicalError> {
        self.referential.require_client(request.client_id).await?;

        let body = json!({
            "client_id": request.client_id,
            "assessment_date": request.assessment_date.unwrap_or_else(utc_today),
            "presenting_problem": request.presenting_problem,
            "history": request.history,
            "mental_status": request.mental_status,
            "diagnosis_code": request.diagnosis_code,
            "risk_level": request.risk_level,
            "recommendations": request.recommendations,
        });

        let assessment: InitialAssessment = self.supabase.insert("initial_assessments", body).await?;
        info!("Initial assessment {} recorded for client {}", assessment.id, assessment.client_id);
        Ok(assessment)
    }

    pub async fn list_for_client(&self, client_id: i64) -> Result<Vec<InitialAssessment>> {
        self.supabase
            .select(
                "initial_assessments",
                &format!("client_id=eq.{}&order=assessment_date.desc", client_id),
            )
            .await
    }
}

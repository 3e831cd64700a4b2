use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{appointment_routes, telehealth_routes};
use auth_cell::auth_routes;
use billing_cell::billing_routes;
use client_cell::{
    client_routes, dashboard_routes, document_routes, family_contact_routes, insurance_routes,
    reminder_routes,
};
use clinical_cell::{assessment_routes, note_routes};
use shared_config::AppConfig;
use staff_cell::{admin_routes, staff_assignment_routes};

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Wellspring EHR API is running!" }))
        .nest("/user", auth_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state.clone()))
        .nest("/clients", client_routes(state.clone()))
        .nest("/family-contacts", family_contact_routes(state.clone()))
        .nest("/insurance", insurance_routes(state.clone()))
        .nest("/documents", document_routes(state.clone()))
        .nest("/reminders", reminder_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/telehealth", telehealth_routes(state.clone()))
        .nest("/notes", note_routes(state.clone()))
        .nest("/assessments", assessment_routes(state.clone()))
        .nest("/staff-assignments", staff_assignment_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .nest("/billing", billing_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shared_utils::test_utils::{send_json, TestConfig};

    #[tokio::test]
    async fn test_liveness() {
        let app = create_router(TestConfig::default().to_arc());
        let (status, _) = send_json(app, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cells_are_mounted_behind_auth() {
        let state = TestConfig::default().to_arc();
        for uri in [
            "/dashboard",
            "/clients/1",
            "/appointments/calendar?start=2030-01-01&end=2030-01-02",
            "/notes/client/1",
            "/staff-assignments/client/1",
            "/billing/invoices",
            "/telehealth/sessions",
        ] {
            let (status, _) = send_json(create_router(state.clone()), "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }
}

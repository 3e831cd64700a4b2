use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduling_cell::models::SchedulingError;
use scheduling_cell::services::{EntityStore, SupabaseEntityStore};
use shared_database::SupabaseClient;
use shared_models::entities::{AppointmentStatus, StaffRole};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

async fn store_for(server: &MockServer) -> SupabaseEntityStore {
    let config = TestConfig::with_store(&server.uri());
    SupabaseEntityStore::new(Arc::new(SupabaseClient::new(&config)))
}

#[tokio::test]
async fn test_get_client_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .and(query_param("id", "eq.3"))
        .and(header("apikey", "test-service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::client_response(3, "Ada", "Lovelace")
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let client = store.get_client(3).await.unwrap().unwrap();

    assert_eq!(client.full_name(), "Ada Lovelace");
}

#[tokio::test]
async fn test_missing_rows_are_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    assert!(store.get_client(1).await.unwrap().is_none());
    assert!(store.get_staff_user(1).await.unwrap().is_none());
    assert!(store.get_appointment(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_staff_lookup_never_selects_password_hash() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.8"))
        .and(query_param("select", "id,email,full_name,role,is_active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::staff_user_response(8, "waads")
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let staff = store.get_staff_user(8).await.unwrap().unwrap();

    assert_eq!(staff.role, StaffRole::Waads);
}

#[tokio::test]
async fn test_list_assignments_filters_on_pair() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff_assignments"))
        .and(query_param("client_id", "eq.1"))
        .and(query_param("staff_user_id", "eq.10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::assignment_response(100, 1, 10, "2025-03-01", "2025-03-10"),
            MockSupabaseResponses::assignment_response(101, 1, 10, "2025-04-01", "2025-04-30"),
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let rows = store.list_assignments_for(1, 10).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
}

#[tokio::test]
async fn test_appointment_status_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(12, 1, 10, "no_show")
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server).await;
    let appointment = store.get_appointment(12).await.unwrap().unwrap();

    assert_eq!(appointment.status, AppointmentStatus::NoShow);
}

#[tokio::test]
async fn test_exclusion_violation_maps_to_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/staff_assignments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response(
                "conflicting key value violates exclusion constraint \"staff_assignments_no_overlap\"",
                "23P01",
            ),
        ))
        .mount(&server)
        .await;

    let supabase = SupabaseClient::new(&TestConfig::with_store(&server.uri()));
    let err = supabase
        .insert::<serde_json::Value>("staff_assignments", json!({ "client_id": 1 }))
        .await
        .unwrap_err();

    assert_matches!(SchedulingError::from_store_write(err), SchedulingError::Conflict(_));
}

#[tokio::test]
async fn test_other_write_failures_stay_store_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let supabase = SupabaseClient::new(&TestConfig::with_store(&server.uri()));
    let err = supabase
        .insert::<serde_json::Value>("staff_assignments", json!({}))
        .await
        .unwrap_err();

    assert_matches!(SchedulingError::from_store_write(err), SchedulingError::Store(_));
}

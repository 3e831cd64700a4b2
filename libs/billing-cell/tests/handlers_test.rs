use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use billing_cell::billing_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{send_json, JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn setup(server: &MockServer) -> (Arc<AppConfig>, String) {
    let config = TestConfig::with_store(&server.uri());
    let token = JwtTestUtils::create_test_token(&TestUser::billing(3), &config.jwt_secret, Some(1));
    (Arc::new(config), token)
}

async fn mount_client(server: &MockServer, client_id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .and(query_param("id", format!("eq.{}", client_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::client_response(client_id, "Rosa", "Parks")
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_create_invoice() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);
    mount_client(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/invoices"))
        .and(body_partial_json(json!({ "client_id": 1, "total_amount": 150.0, "status": "pending" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 20, "client_id": 1, "total_amount": 150.0, "status": "pending",
            "description": "Intake session", "bill_to_name": null, "bill_to_relationship": null,
            "created_at": "2030-06-03T12:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send_json(
        billing_routes(config),
        "POST",
        "/invoices",
        Some(json!({ "client_id": 1, "total_amount": 150.0, "description": "Intake session" })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 20);
}

#[tokio::test]
async fn test_zero_invoice_is_rejected() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);

    let (status, body) = send_json(
        billing_routes(config),
        "POST",
        "/invoices",
        Some(json!({ "client_id": 1, "total_amount": 0.0 })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "total_amount must be greater than zero");
}

#[tokio::test]
async fn test_invoice_for_unknown_client_is_404() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (status, _) = send_json(
        billing_routes(config),
        "POST",
        "/invoices",
        Some(json!({ "client_id": 42, "total_amount": 10.0 })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_invoices_for_client() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/invoices"))
        .and(query_param("client_id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send_json(billing_routes(config), "GET", "/invoices?client_id=1", None, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_claim_against_another_clients_appointment_is_rejected() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);
    mount_client(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(7, 5, 2, "completed")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/claims"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send_json(
        billing_routes(config),
        "POST",
        "/claims",
        Some(json!({ "client_id": 1, "appointment_id": 7, "payer_name": "Acme Health", "amount": 90.0 })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("belongs to client 5"));
}

#[tokio::test]
async fn test_claim_for_own_appointment() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);
    mount_client(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response(7, 1, 2, "completed")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/claims"))
        .and(body_partial_json(json!({ "appointment_id": 7, "status": "draft" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 31, "client_id": 1, "appointment_id": 7, "payer_name": "Acme Health",
            "status": "draft", "amount": 90.0, "claim_number": null,
            "created_at": "2030-06-03T12:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send_json(
        billing_routes(config),
        "POST",
        "/claims",
        Some(json!({ "client_id": 1, "appointment_id": 7, "payer_name": "Acme Health", "amount": 90.0 })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "draft");
}

#[tokio::test]
async fn test_claim_for_missing_appointment_is_404() {
    let server = MockServer::start().await;
    let (config, token) = setup(&server);
    mount_client(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (status, body) = send_json(
        billing_routes(config),
        "POST",
        "/claims",
        Some(json!({ "client_id": 1, "appointment_id": 70, "payer_name": "Acme Health", "amount": 90.0 })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Appointment 70 not found");
}

use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_config::AppConfig;
use shared_models::auth::{TokenType, User};

use crate::jwt::{issue_token, TokenSubject};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            ..AppConfig::default()
        }
    }

    pub fn with_store(store_uri: &str) -> AppConfig {
        AppConfig {
            supabase_url: store_uri.to_string(),
            ..Self::default().to_app_config()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: 1,
            email: "test@example.com".to_string(),
            role: "provider".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(id: i64, email: &str, role: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn provider(id: i64) -> Self {
        Self::new(id, "provider@example.com", "provider")
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, "admin@example.com", "admin")
    }

    pub fn billing(id: i64) -> Self {
        Self::new(id, "billing@example.com", "billing")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.to_string(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            token_type: Some(TokenType::Access),
            created_at: None,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        Self::create_token_of_type(user, secret, TokenType::Access, exp_hours)
    }

    pub fn create_token_of_type(
        user: &TestUser,
        secret: &str,
        token_type: TokenType,
        exp_hours: Option<i64>,
    ) -> String {
        let subject = TokenSubject {
            user_id: user.id,
            email: &user.email,
            role: &user.role,
        };
        issue_token(&subject, token_type, Duration::hours(exp_hours.unwrap_or(24)), secret)
            .expect("test secret must not be empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn client_response(client_id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id": client_id,
            "first_name": first_name,
            "last_name": last_name,
            "date_of_birth": "1988-04-12",
            "email": null,
            "phone": "555-0100",
            "address": null,
            "emergency_contact_name": null,
            "emergency_contact_phone": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn staff_user_response(user_id: i64, role: &str) -> serde_json::Value {
        json!({
            "id": user_id,
            "email": format!("staff{}@example.com", user_id),
            "full_name": "Test Staff",
            "role": role,
            "is_active": true
        })
    }

    pub fn appointment_response(
        appointment_id: i64,
        client_id: i64,
        provider_id: i64,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "client_id": client_id,
            "provider_id": provider_id,
            "start_time": "2030-06-03T10:00:00Z",
            "end_time": "2030-06-03T11:00:00Z",
            "type": "individual",
            "status": status,
            "location": "Room 2"
        })
    }

    pub fn assignment_response(
        assignment_id: i64,
        client_id: i64,
        staff_user_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> serde_json::Value {
        json!({
            "id": assignment_id,
            "client_id": client_id,
            "staff_user_id": staff_user_id,
            "role": "provider",
            "is_primary": false,
            "start_date": start_date,
            "end_date": end_date,
            "notes": null
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "code": code,
            "message": message,
            "details": null,
            "hint": null
        })
    }
}

/// Drives one request through a router and decodes the JSON reply
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

    let request = builder.body(body).expect("test request must be well formed");
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body must be readable");

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_service_key, "test-service-key");
        assert!(app_config.is_configured());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::admin(5);
        assert_eq!(user.role, "admin");

        let user_model = user.to_user();
        assert_eq!(user_model.role, Some(user.role.clone()));
        assert_eq!(user_model.id, "5");
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&user, secret, Some(1));

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, secret).unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_send_json_round_trip() {
        use axum::routing::post;

        let app = Router::new().route("/echo", post(|axum::Json(v): axum::Json<Value>| async move { axum::Json(v) }));
        let (status, body) = send_json(app, "POST", "/echo", Some(json!({ "a": 1 })), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["a"], 1);
    }

    #[test]
    fn test_expired_and_forged_tokens() {
        let user = TestUser::default();
        let secret = "test-secret";

        assert!(validate_token(&JwtTestUtils::create_expired_token(&user, secret), secret).is_err());
        assert!(validate_token(&JwtTestUtils::create_invalid_signature_token(&user), secret).is_err());
        assert!(validate_token(&JwtTestUtils::create_malformed_token(), secret).is_err());
    }
}

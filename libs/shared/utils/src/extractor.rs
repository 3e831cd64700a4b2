use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::Body,
};

use shared_models::auth::{TokenType, User};
use shared_models::error::AppError;
use shared_config::AppConfig;

use crate::jwt::validate_token;

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) => Ok(token.to_string()),
        None => Err(AppError::Auth("Invalid authorization header format".to_string())),
    }
}

// Only access tokens open protected routes; refresh tokens are for /user/refresh.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;

    let user = validate_token(&token, &config.jwt_secret)
        .map_err(AppError::Auth)?;

    if user.token_type == Some(TokenType::Refresh) {
        return Err(AppError::Auth("Refresh token cannot be used for this request".to_string()));
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub fn require_role(user: &User, allowed: &[&str]) -> Result<(), AppError> {
    if allowed.iter().any(|role| user.has_role(role)) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Requires one of the roles: {}",
            allowed.join(", ")
        )))
    }
}

/// Numeric staff id of the caller, for columns such as `uploaded_by_user_id`.
pub fn current_staff_id(user: &User) -> Result<i64, AppError> {
    user.numeric_id()
        .ok_or_else(|| AppError::Auth("Token subject is not a staff id".to_string()))
}

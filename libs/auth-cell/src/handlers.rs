use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::auth::{TokenResponse, TokenType, User};
use shared_models::entities::StaffRole;
use shared_models::error::AppError;
use shared_utils::extractor::current_staff_id;
use shared_utils::jwt;

use crate::models::{
    AuthError, CreateUserRequest, ForgotPasswordRequest, LoginRequest, RefreshRequest,
    ResetPasswordRequest, StoredUser, UserProfile, UserSummary, VerifyResetTokenRequest,
};
use crate::services::password::{hash_password, validate_password_strength, verify_password};
use crate::services::tokens::{generate_reset_token, issue_access_token, issue_session};
use crate::services::{NotificationSink, UserService};

#[axum::debug_handler]
pub async fn create_user(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let role: StaffRole = request.role.parse().map_err(AuthError::InvalidRole)?;
    validate_password_strength(&request.password)?;

    let hashed = hash_password(&request.password)?;
    let service = UserService::new(&config);
    let user = service
        .create(
            &request.email,
            request.full_name.as_deref().unwrap_or_default(),
            role,
            &hashed,
        )
        .await?;

    let tokens = issue_session(&config, &user)?;

    Ok(Json(json!({
        "success": true,
        "message": "User created successfully.",
        "user_id": user.id,
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
    })))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);

    let user = service
        .find_by_email(&request.email)
        .await
        .map_err(AuthError::Store)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.hashed_password) {
        warn!("Failed login for user {}", user.id);
        return Err(AuthError::InvalidCredentials.into());
    }
    if !user.is_active {
        return Err(AuthError::AccountDisabled.into());
    }

    let tokens = issue_session(&config, &user)?;
    info!("User {} logged in", user.id);

    Ok(Json(json!({
        "message": "Login successful.",
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
        "token_type": tokens.token_type,
        "user": UserSummary::from(&user),
    })))
}

#[axum::debug_handler]
pub async fn refresh(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<Value>, AppError> {
    let claims = jwt::validate_token(&request.refresh_token, &config.jwt_secret)
        .map_err(AuthError::InvalidToken)?;

    if claims.token_type != Some(TokenType::Refresh) {
        return Err(AuthError::InvalidToken("Not a refresh token".to_string()).into());
    }

    let user = load_active_user(&config, &claims).await?;
    let access_token = issue_access_token(&config, &user)?;

    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "bearer",
    })))
}

#[axum::debug_handler]
pub async fn forgot_password(
    State(config): State<Arc<AppConfig>>,
    Extension(notifier): Extension<Arc<dyn NotificationSink>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);

    let user = service
        .find_by_email(&request.email)
        .await
        .map_err(AuthError::Store)?
        .ok_or(AuthError::EmailNotFound)?;

    let token = generate_reset_token();
    let expires = Utc::now() + Duration::minutes(config.reset_token_expire_minutes);
    service
        .set_reset_token(user.id, &token, expires)
        .await
        .map_err(AuthError::Store)?;

    let reset_link = format!("{}?token={}", config.frontend_url, token);
    notifier
        .send_password_reset(&user.email, &reset_link)
        .await
        .map_err(|e| AuthError::Notification(e.to_string()))?;

    Ok(Json(json!({ "message": "Password reset link sent to email" })))
}

#[axum::debug_handler]
pub async fn verify_reset_token(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<VerifyResetTokenRequest>,
) -> Result<Json<Value>, AppError> {
    let user = user_for_reset_token(&config, &request.token).await?;

    Ok(Json(json!({
        "valid": true,
        "message": "Token is valid",
        "email": user.email,
    })))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    validate_password_strength(&request.new_password)?;
    if request.new_password != request.confirm_password {
        return Err(AuthError::PasswordMismatch.into());
    }

    let user = user_for_reset_token(&config, &request.token).await?;
    let hashed = hash_password(&request.new_password)?;

    UserService::new(&config)
        .update_password(user.id, &hashed)
        .await
        .map_err(AuthError::Store)?;

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully",
    })))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let user = jwt::validate_token(auth.token(), &config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let valid = jwt::validate_token(auth.token(), &config.jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}

#[axum::debug_handler]
pub async fn get_me(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<UserProfile>, AppError> {
    let stored = load_active_user(&config, &user).await?;
    Ok(Json(UserProfile::from(stored)))
}

async fn load_active_user(config: &AppConfig, user: &User) -> Result<StoredUser, AppError> {
    let user_id = current_staff_id(user)?;

    let stored = UserService::new(config)
        .find_by_id(user_id)
        .await
        .map_err(AuthError::Store)?
        .ok_or_else(|| AuthError::InvalidToken("User no longer exists".to_string()))?;

    if !stored.is_active {
        return Err(AuthError::AccountDisabled.into());
    }
    Ok(stored)
}

async fn user_for_reset_token(config: &AppConfig, token: &str) -> Result<StoredUser, AuthError> {
    let user = UserService::new(config)
        .find_by_reset_token(token)
        .await?
        .ok_or(AuthError::InvalidResetToken)?;

    match user.reset_token_expires {
        Some(expires) if expires >= Utc::now() => Ok(user),
        _ => Err(AuthError::ExpiredResetToken),
    }
}

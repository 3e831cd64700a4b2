use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::entities::StaffRole;
use shared_models::error::AppError;

// ==============================================================================
// STORED USER
// ==============================================================================

/// Full `users` row, credentials included. Never serialized back to callers.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: StaffRole,
    pub is_active: bool,
    pub hashed_password: String,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: StaffRole,
}

impl From<&StoredUser> for UserSummary {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: StaffRole,
    pub is_active: bool,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
        }
    }
}

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResetTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email_exists")]
    EmailExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    InvalidRole(String),

    #[error("Email not found")]
    EmailNotFound,

    #[error("Invalid token")]
    InvalidResetToken,

    #[error("Token expired")]
    ExpiredResetToken,

    #[error("{0}")]
    InvalidToken(String),

    #[error("Failed to send reset email: {0}")]
    Notification(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::EmailExists | AuthError::InvalidCredentials => AppError::BadRequest(message),
            AuthError::WeakPassword(_) | AuthError::PasswordMismatch | AuthError::InvalidRole(_) => {
                AppError::ValidationError(message)
            }
            AuthError::AccountDisabled | AuthError::InvalidToken(_) => AppError::Auth(message),
            AuthError::EmailNotFound | AuthError::InvalidResetToken => AppError::NotFound(message),
            AuthError::ExpiredResetToken => AppError::Gone(message),
            AuthError::Notification(_) => AppError::ExternalService(message),
            AuthError::Hashing(_) => AppError::Internal(message),
            AuthError::Store(_) => AppError::Database(message),
        }
    }
}

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use rand::RngCore;

use shared_config::AppConfig;
use shared_models::auth::TokenType;
use shared_utils::jwt::{issue_token, TokenSubject};

use crate::models::{AuthError, SessionTokens, StoredUser};

const RESET_TOKEN_BYTES: usize = 32;

fn subject(user: &StoredUser) -> TokenSubject<'_> {
    TokenSubject {
        user_id: user.id,
        email: &user.email,
        role: user.role.as_str(),
    }
}

pub fn issue_access_token(config: &AppConfig, user: &StoredUser) -> Result<String, AuthError> {
    issue_token(
        &subject(user),
        TokenType::Access,
        Duration::minutes(config.access_token_expire_minutes),
        &config.jwt_secret,
    )
    .map_err(AuthError::InvalidToken)
}

pub fn issue_session(config: &AppConfig, user: &StoredUser) -> Result<SessionTokens, AuthError> {
    let access_token = issue_access_token(config, user)?;
    let refresh_token = issue_token(
        &subject(user),
        TokenType::Refresh,
        Duration::days(config.refresh_expire_days),
        &config.jwt_secret,
    )
    .map_err(AuthError::InvalidToken)?;

    Ok(SessionTokens {
        access_token,
        refresh_token,
        token_type: "bearer",
    })
}

/// 32 random bytes, URL-safe base64 without padding.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::entities::StaffRole;
    use shared_utils::jwt::validate_token;

    fn user() -> StoredUser {
        StoredUser {
            id: 12,
            email: "front.desk@example.com".to_string(),
            full_name: String::new(),
            role: StaffRole::Admin,
            is_active: true,
            hashed_password: String::new(),
            reset_token: None,
            reset_token_expires: None,
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            jwt_secret: "tokens-test-secret".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_session_tokens_carry_type_and_role() {
        let config = config();
        let session = issue_session(&config, &user()).unwrap();

        let access = validate_token(&session.access_token, &config.jwt_secret).unwrap();
        let refresh = validate_token(&session.refresh_token, &config.jwt_secret).unwrap();

        assert_eq!(access.id, "12");
        assert_eq!(access.role.as_deref(), Some("admin"));
        assert_eq!(access.token_type, Some(TokenType::Access));
        assert_eq!(refresh.token_type, Some(TokenType::Refresh));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let config = AppConfig::default();
        assert!(issue_session(&config, &user()).is_err());
    }

    #[test]
    fn test_reset_tokens_are_url_safe_and_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();

        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

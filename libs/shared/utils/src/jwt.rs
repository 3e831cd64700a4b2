use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use tracing::debug;
use shared_models::auth::{JwtClaims, TokenType, User};

type HmacSha256 = Hmac<Sha256>;

/// Identity carried into a freshly issued token.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: i64,
    pub email: &'a str,
    pub role: &'a str,
}

fn sign(signing_input: &str, jwt_secret: &str) -> Result<String, String> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

pub fn issue_token(
    subject: &TokenSubject<'_>,
    token_type: TokenType,
    lifetime: Duration,
    jwt_secret: &str,
) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let exp = now + lifetime;

    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let claims = json!({
        "sub": subject.user_id.to_string(),
        "email": subject.email,
        "role": subject.role,
        "iat": now.timestamp(),
        "exp": exp.timestamp(),
        "token_type": token_type,
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = sign(&signing_input, jwt_secret)?;

    debug!("Issued {:?} token for user {}", token_type, subject.user_id);
    Ok(format!("{}.{}", signing_input, signature))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        },
    };

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let created_at = claims.iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        token_type: claims.token_type,
        created_at,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn subject() -> TokenSubject<'static> {
        TokenSubject { user_id: 42, email: "nurse@example.com", role: "provider" }
    }

    #[test]
    fn test_issued_token_validates() {
        let token = issue_token(&subject(), TokenType::Access, Duration::minutes(5), SECRET).unwrap();
        let user = validate_token(&token, SECRET).unwrap();

        assert_eq!(user.id, "42");
        assert_eq!(user.role.as_deref(), Some("provider"));
        assert_eq!(user.token_type, Some(TokenType::Access));
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(&subject(), TokenType::Access, Duration::minutes(5), SECRET).unwrap();
        assert_eq!(validate_token(&token, "other").unwrap_err(), "Invalid token signature");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(&subject(), TokenType::Refresh, Duration::hours(-1), SECRET).unwrap();
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), "Token expired");
    }

    #[test]
    fn test_missing_secret() {
        assert!(issue_token(&subject(), TokenType::Access, Duration::minutes(5), "").is_err());
        assert_eq!(validate_token("a.b.c", "").unwrap_err(), "JWT secret is not set");
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(validate_token("not-a-token", SECRET).unwrap_err(), "Invalid token format");
    }
}

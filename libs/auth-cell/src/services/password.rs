use std::sync::LazyLock;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use regex::Regex;
use tracing::instrument;

use crate::models::AuthError;

pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*(),.?":{}|<>"#;

#[instrument(skip(password))]
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// A stored hash that cannot be parsed counts as a failed match.
#[instrument(skip(password, hash))]
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

const STRENGTH_RULES: [(&str, &str); 4] = [
    (r"[A-Z]", "Password must contain at least one uppercase letter"),
    (r"[a-z]", "Password must contain at least one lowercase letter"),
    (r"\d", "Password must contain at least one digit"),
    (r#"[!@#$%^&*(),.?":{}|<>]"#, "Password must contain at least one special character"),
];

static COMPILED_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    STRENGTH_RULES
        .iter()
        .map(|(pattern, message)| {
            let rule = Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid password rule {}: {}", pattern, e));
            (rule, *message)
        })
        .collect()
});

/// Minimum 8 characters with upper, lower, digit and one of [`SPECIAL_CHARACTERS`].
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < 8 {
        return Err(AuthError::WeakPassword(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    for (rule, message) in COMPILED_RULES.iter() {
        if !rule.is_match(password) {
            return Err(AuthError::WeakPassword(message.to_string()));
        }
    }

    Ok(())
}

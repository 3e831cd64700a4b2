use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{SupabaseClient, SupabaseError};
use shared_models::entities::StaffRole;

use crate::models::{AuthError, StoredUser};

pub struct UserService {
    supabase: Arc<SupabaseClient>,
}

/// Lower-cased and trimmed, the form e-mails are stored and looked up in.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        debug!("Looking up user by email");
        self.supabase
            .select_one(
                "users",
                &format!("email=eq.{}", urlencoding::encode(&normalize_email(email))),
            )
            .await
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<StoredUser>> {
        self.supabase
            .select_one("users", &format!("id=eq.{}", user_id))
            .await
    }

    pub async fn find_by_reset_token(&self, token: &str) -> Result<Option<StoredUser>> {
        self.supabase
            .select_one(
                "users",
                &format!("reset_token=eq.{}", urlencoding::encode(token)),
            )
            .await
    }

    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        role: StaffRole,
        hashed_password: &str,
    ) -> Result<StoredUser, AuthError> {
        let email = normalize_email(email);

        if self.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailExists);
        }

        let body = json!({
            "email": email,
            "full_name": full_name,
            "role": role,
            "is_active": true,
            "hashed_password": hashed_password,
        });

        let user: StoredUser = self.supabase.insert("users", body).await.map_err(|e| {
            // Two sign-ups racing on one address hit the unique index.
            match SupabaseError::find(&e) {
                Some(store_err) if store_err.is_unique_violation() => AuthError::EmailExists,
                _ => AuthError::Store(e),
            }
        })?;

        info!("Created user {} with role {}", user.id, user.role);
        Ok(user)
    }

    pub async fn set_reset_token(&self, user_id: i64, token: &str, expires: DateTime<Utc>) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .supabase
            .patch(
                "users",
                &format!("id=eq.{}", user_id),
                json!({
                    "reset_token": token,
                    "reset_token_expires": expires.to_rfc3339(),
                }),
            )
            .await?;
        Ok(())
    }

    /// Stores the new hash and clears any outstanding reset token.
    pub async fn update_password(&self, user_id: i64, hashed_password: &str) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .supabase
            .patch(
                "users",
                &format!("id=eq.{}", user_id),
                json!({
                    "hashed_password": hashed_password,
                    "reset_token": null,
                    "reset_token_expires": null,
                }),
            )
            .await?;

        info!("Password updated for user {}", user_id);
        Ok(())
    }
}

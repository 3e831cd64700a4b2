use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub refresh_expire_days: i64,
    pub reset_token_expire_minutes: i64,
    pub frontend_url: String,
    pub telehealth_base_url: String,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: String::new(),
            access_token_expire_minutes: 60,
            refresh_expire_days: 7,
            reset_token_expire_minutes: 30,
            frontend_url: "http://localhost:3000".to_string(),
            telehealth_base_url: "https://video.wellspring-ehr.local".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            access_token_expire_minutes: parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", defaults.access_token_expire_minutes),
            refresh_expire_days: parse_or("REFRESH_EXPIRE_DAYS", defaults.refresh_expire_days),
            reset_token_expire_minutes: parse_or("RESET_TOKEN_EXPIRE_MINUTES", defaults.reset_token_expire_minutes),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| {
                    warn!("FRONTEND_URL not set, using default");
                    defaults.frontend_url.clone()
                }),
            telehealth_base_url: env::var("TELEHEALTH_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("TELEHEALTH_BASE_URL not set, using default");
                    defaults.telehealth_base_url.clone()
                }),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }
}

fn parse_or(key: &str, default: i64) -> i64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid integer ({}), using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Outbound channel for account e-mails.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_password_reset(&self, email: &str, reset_link: &str) -> Result<()>;
}

/// Writes reset links to the log instead of mailing them.
#[derive(Debug, Default, Clone)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn send_password_reset(&self, email: &str, reset_link: &str) -> Result<()> {
        info!("Password reset requested for {}: {}", email, reset_link);
        Ok(())
    }
}

use jobportal_core::error::CoreError;
use jobportal_core::status::NotificationChannel;
use jobportal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `message_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageTemplate {
    pub id: DbId,
    pub code: String,
    pub channel: String,
    pub subject: String,
    pub body: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MessageTemplate {
    pub fn channel(&self) -> Result<NotificationChannel, CoreError> {
        self.channel.parse().map_err(|_| {
            CoreError::Configuration(format!(
                "Template '{}' has unknown channel '{}'",
                self.code, self.channel
            ))
        })
    }
}

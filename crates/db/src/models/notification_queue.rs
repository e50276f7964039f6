//! Notification queue entity model and DTOs.

use jobportal_core::error::CoreError;
use jobportal_core::status::{NotificationChannel, QueueStatus};
use jobportal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notification_queue` table.
///
/// Rows are never deleted; `status`, `attempts`, `last_error`,
/// `claimed_at` and `sent_at` are only written by the drain.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationQueueItem {
    pub id: DbId,
    pub recipient_id: DbId,
    pub channel: String,
    pub recipient_address: String,
    pub subject: String,
    pub body: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<DbId>,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub scheduled_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl NotificationQueueItem {
    pub fn channel(&self) -> Result<NotificationChannel, CoreError> {
        self.channel.parse()
    }

    pub fn status(&self) -> Result<QueueStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for inserting a pending queue item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQueueItem {
    pub recipient_id: DbId,
    pub channel: NotificationChannel,
    pub recipient_address: String,
    pub subject: String,
    pub body: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<DbId>,
    /// Defaults to now.
    pub scheduled_at: Option<Timestamp>,
}

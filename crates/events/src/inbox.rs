//! Read side of the in-app inbox filled by `system` queue items.

use jobportal_core::types::DbId;
use jobportal_db::models::notification::InboxNotification;
use jobportal_db::repositories::NotificationRepo;
use jobportal_db::DbPool;

use crate::error::QueueError;

/// Page size when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct Inbox {
    pool: DbPool,
}

impl Inbox {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Newest first. `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub async fn list(
        &self,
        user_id: DbId,
        unread_only: bool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<InboxNotification>, QueueError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        Ok(NotificationRepo::list_for_user(&self.pool, user_id, unread_only, limit, offset).await?)
    }

    pub async fn unread_count(&self, user_id: DbId) -> Result<i64, QueueError> {
        Ok(NotificationRepo::unread_count(&self.pool, user_id).await?)
    }

    /// Returns `false` if the notification is not an unread one of this user.
    pub async fn mark_read(&self, user_id: DbId, notification_id: DbId) -> Result<bool, QueueError> {
        Ok(NotificationRepo::mark_read(&self.pool, notification_id, user_id).await?)
    }

    pub async fn mark_all_read(&self, user_id: DbId) -> Result<u64, QueueError> {
        Ok(NotificationRepo::mark_all_read(&self.pool, user_id).await?)
    }
}

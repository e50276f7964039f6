//! Repository for the `notification_queue` table.
//!
//! Uses `QueueStatus` from `jobportal_core::status` for every status
//! literal. Items move `pending -> processing -> sent | failed`; the
//! `processing` claim is what keeps concurrent drains from double-sending.

use jobportal_core::status::QueueStatus;
use jobportal_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::notification_queue::{NewQueueItem, NotificationQueueItem};

/// Column list for `notification_queue` queries.
const COLUMNS: &str = "\
    id, recipient_id, channel, recipient_address, subject, body, \
    reference_type, reference_id, status, attempts, last_error, \
    scheduled_at, claimed_at, sent_at, created_at";

/// Provides enqueue, claim and outcome operations for queued notifications.
pub struct NotificationQueueRepo;

impl NotificationQueueRepo {
    /// Insert a pending item. Accepts a pool or an open transaction.
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        item: &NewQueueItem,
    ) -> Result<NotificationQueueItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_queue \
                (recipient_id, channel, recipient_address, subject, body, \
                 reference_type, reference_id, status, scheduled_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationQueueItem>(&query)
            .bind(item.recipient_id)
            .bind(item.channel.as_str())
            .bind(&item.recipient_address)
            .bind(&item.subject)
            .bind(&item.body)
            .bind(&item.reference_type)
            .bind(item.reference_id)
            .bind(QueueStatus::Pending.as_str())
            .bind(item.scheduled_at)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NotificationQueueItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_queue WHERE id = $1");
        sqlx::query_as::<_, NotificationQueueItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim up to `limit` due pending items, oldest first.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so that concurrent drains
    /// receive disjoint batches.
    pub async fn claim_due(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<NotificationQueueItem>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_queue \
             SET status = $2, claimed_at = NOW() \
             WHERE id IN ( \
                 SELECT id FROM notification_queue \
                 WHERE status = $3 AND scheduled_at <= NOW() \
                 ORDER BY scheduled_at ASC, id ASC \
                 LIMIT $1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        let mut items = sqlx::query_as::<_, NotificationQueueItem>(&query)
            .bind(limit)
            .bind(QueueStatus::Processing.as_str())
            .bind(QueueStatus::Pending.as_str())
            .fetch_all(pool)
            .await?;
        // RETURNING does not preserve the subquery order.
        items.sort_by_key(|item| (item.scheduled_at, item.id));
        tracing::debug!(claimed = items.len(), "Claimed notification queue items");
        Ok(items)
    }

    /// Record a successful delivery.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_queue \
             SET status = $2, sent_at = NOW(), attempts = attempts + 1, last_error = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .bind(QueueStatus::Sent.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failed delivery. The item is not re-queued.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_queue \
             SET status = $2, attempts = attempts + 1, last_error = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(QueueStatus::Failed.as_str())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Items addressed to a recipient, newest first.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient_id: DbId,
    ) -> Result<Vec<NotificationQueueItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_queue \
             WHERE recipient_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, NotificationQueueItem>(&query)
            .bind(recipient_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_status(pool: &PgPool, status: QueueStatus) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notification_queue WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }
}

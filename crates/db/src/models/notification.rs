//! In-app inbox notification model.

use jobportal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table, written when a `system` queue
/// item is delivered.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InboxNotification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

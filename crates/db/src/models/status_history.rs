//! Status history model. Rows are append-only (no `updated_at`).

use jobportal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `application_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistoryEntry {
    pub id: DbId,
    pub application_id: DbId,
    pub old_status: Option<String>,
    pub new_status: String,
    pub changed_by: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

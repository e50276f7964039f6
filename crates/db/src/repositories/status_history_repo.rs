//! Repository for the append-only `application_status_history` table.

use jobportal_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::status_history::StatusHistoryEntry;

/// Column list for `application_status_history` queries.
const COLUMNS: &str = "id, application_id, old_status, new_status, changed_by, notes, created_at";

/// Provides append and query operations for status history. There is no
/// update or delete.
pub struct StatusHistoryRepo;

impl StatusHistoryRepo {
    /// Append one transition inside the caller's transaction.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        application_id: DbId,
        old_status: &str,
        new_status: &str,
        changed_by: Option<DbId>,
        notes: Option<&str>,
    ) -> Result<StatusHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO application_status_history \
                (application_id, old_status, new_status, changed_by, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(application_id)
            .bind(old_status)
            .bind(new_status)
            .bind(changed_by)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// History of an application in write order.
    pub async fn list_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM application_status_history \
             WHERE application_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }
}

//! Audit sink backed by the `audit_logs` table.

use jobportal_core::audit::{AuditEntry, AuditSink};
use jobportal_core::error::CoreError;
use jobportal_db::models::audit::CreateAuditLog;
use jobportal_db::repositories::AuditLogRepo;
use jobportal_db::DbPool;

pub struct PgAuditSink {
    pool: DbPool,
}

impl PgAuditSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<(), CoreError> {
        AuditLogRepo::insert(&self.pool, &CreateAuditLog::from(entry))
            .await
            .map(|_| ())
            .map_err(|e| CoreError::Internal(format!("Failed to write audit log: {e}")))
    }
}

//! Audit log entity models (immutable records, no `updated_at`).

use jobportal_core::audit::AuditEntry;
use jobportal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub description: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub description: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

impl From<&AuditEntry> for CreateAuditLog {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            user_id: entry.actor_id,
            action_type: entry.action_type.clone(),
            entity_type: entry.resource_type.clone(),
            entity_id: entry.resource_id,
            description: entry.description.clone(),
            old_values: entry.old_values.clone(),
            new_values: entry.new_values.clone(),
        }
    }
}

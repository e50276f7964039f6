//! Audit trail contract.
//!
//! Lifecycle operations describe what happened as an [`AuditEntry`] and
//! hand it to whichever [`AuditSink`] was wired in at startup. Sinks may
//! fail; callers log and ignore the failure.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Known action types for audit log entries.
pub mod action_types {
    pub const STATUS_CHANGE: &str = "status_change";
    pub const ELIGIBILITY_CHECK: &str = "eligibility_check";
    pub const INTERVIEW_SCHEDULED: &str = "interview_scheduled";
    pub const CRITERIA_CHANGE: &str = "criteria_change";
}

/// Known resource types for audit log entries.
pub mod resource_types {
    pub const APPLICATION: &str = "application";
    pub const CRITERION: &str = "eligibility_criterion";
    pub const INTERVIEW: &str = "interview";
}

/// One audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub actor_id: Option<DbId>,
    pub action_type: String,
    pub resource_type: String,
    pub resource_id: Option<DbId>,
    pub description: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(
        action_type: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: DbId,
    ) -> Self {
        Self {
            actor_id: None,
            action_type: action_type.into(),
            resource_type: resource_type.into(),
            resource_id: Some(resource_id),
            description: String::new(),
            old_values: None,
            new_values: None,
        }
    }

    pub fn with_actor(mut self, actor_id: Option<DbId>) -> Self {
        self.actor_id = actor_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_change(mut self, old: serde_json::Value, new: serde_json::Value) -> Self {
        self.old_values = Some(old);
        self.new_values = Some(new);
        self
    }
}

/// Destination for audit records.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<(), CoreError>;
}

/// Sink that drops every record, for deployments without an audit table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

#[async_trait::async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _entry: &AuditEntry) -> Result<(), CoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_sets_fields() {
        let entry = AuditEntry::new(action_types::STATUS_CHANGE, resource_types::APPLICATION, 5)
            .with_actor(Some(2))
            .with_description("Status changed")
            .with_change(json!({"status": "draft"}), json!({"status": "submitted"}));
        assert_eq!(entry.actor_id, Some(2));
        assert_eq!(entry.resource_id, Some(5));
        assert_eq!(entry.new_values, Some(json!({"status": "submitted"})));
    }

    #[tokio::test]
    async fn noop_sink_accepts_everything() {
        let entry = AuditEntry::new(action_types::STATUS_CHANGE, resource_types::APPLICATION, 1);
        assert!(NoopAuditSink.record(&entry).await.is_ok());
    }
}

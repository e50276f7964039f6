//! Status transition manager.
//!
//! A transition locks the application row, writes the new status, appends
//! history and queues the applicant's `system` notification in one
//! transaction. The audit entry is written after commit and may fail
//! without affecting the transition.

use std::sync::Arc;

use jobportal_core::actor::ActorContext;
use jobportal_core::audit::{action_types, resource_types, AuditEntry, AuditSink};
use jobportal_core::error::CoreError;
use jobportal_core::status::{ApplicationStatus, NotificationChannel, REFERENCE_APPLICATION};
use jobportal_core::transition::{status_change_message, validate_transition, STATUS_CHANGE_SUBJECT};
use jobportal_core::types::DbId;
use jobportal_db::models::notification_queue::NewQueueItem;
use jobportal_db::models::status_history::StatusHistoryEntry;
use jobportal_db::repositories::{
    ApplicationRepo, NotificationQueueRepo, StatusHistoryRepo, UserRepo,
};
use jobportal_db::DbPool;
use jobportal_events::queue::recipient_address;
use serde::Serialize;
use sqlx::{Postgres, Transaction};

use crate::error::LifecycleError;

/// What a committed transition wrote.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub application_id: DbId,
    pub applicant_id: DbId,
    pub old_status: String,
    pub new_status: ApplicationStatus,
    pub history_id: DbId,
    pub notification_id: DbId,
}

pub struct StatusTransitionManager {
    pool: DbPool,
    audit: Arc<dyn AuditSink>,
}

impl StatusTransitionManager {
    pub fn new(pool: DbPool, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, audit }
    }

    pub async fn update_application_status(
        &self,
        application_id: DbId,
        new_status: ApplicationStatus,
        notes: Option<&str>,
        actor: ActorContext,
    ) -> Result<StatusChange, LifecycleError> {
        let actor_name = self.resolve_actor_name(actor).await?;

        let mut tx = self.pool.begin().await?;
        let change = Self::apply(
            &mut tx,
            application_id,
            new_status,
            notes,
            actor,
            actor_name.as_deref(),
        )
        .await?;
        tx.commit().await?;

        self.after_commit(&change, notes, actor).await;
        Ok(change)
    }

    /// Display name used in the status message. `None` means "System".
    ///
    /// A non-system actor with no user row is rejected here, before any
    /// transaction is opened.
    pub(crate) async fn resolve_actor_name(
        &self,
        actor: ActorContext,
    ) -> Result<Option<String>, LifecycleError> {
        let Some(user_id) = actor.user_id() else {
            return Ok(None);
        };
        let name = UserRepo::display_name(&self.pool, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })?;
        Ok(Some(name))
    }

    /// Lock, validate and write one transition inside the caller's
    /// transaction. Nothing is visible until the caller commits.
    pub(crate) async fn apply(
        tx: &mut Transaction<'_, Postgres>,
        application_id: DbId,
        new_status: ApplicationStatus,
        notes: Option<&str>,
        actor: ActorContext,
        actor_name: Option<&str>,
    ) -> Result<StatusChange, LifecycleError> {
        let locked = ApplicationRepo::lock_for_update(tx, application_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Application",
                id: application_id,
            })?;
        validate_transition(&locked.status, new_status)?;

        ApplicationRepo::set_status(tx, application_id, new_status).await?;
        let history = StatusHistoryRepo::append(
            tx,
            application_id,
            &locked.status,
            new_status.as_str(),
            actor.user_id(),
            notes,
        )
        .await?;

        let owner = UserRepo::find_by_id(&mut **tx, locked.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: locked.user_id,
            })?;
        let body = status_change_message(&locked.status, new_status, actor_name, notes);
        let item = NotificationQueueRepo::insert(
            &mut **tx,
            &NewQueueItem {
                recipient_id: owner.id,
                channel: NotificationChannel::System,
                recipient_address: recipient_address(&owner, NotificationChannel::System)?,
                subject: STATUS_CHANGE_SUBJECT.to_string(),
                body,
                reference_type: Some(REFERENCE_APPLICATION.to_string()),
                reference_id: Some(application_id),
                scheduled_at: None,
            },
        )
        .await?;

        Ok(StatusChange {
            application_id,
            applicant_id: owner.id,
            old_status: locked.status,
            new_status,
            history_id: history.id,
            notification_id: item.id,
        })
    }

    /// Log and audit a committed transition. Audit failures are logged only.
    pub(crate) async fn after_commit(
        &self,
        change: &StatusChange,
        notes: Option<&str>,
        actor: ActorContext,
    ) {
        tracing::info!(
            application_id = change.application_id,
            old_status = %change.old_status,
            new_status = %change.new_status,
            changed_by = ?actor.user_id(),
            "Application status updated"
        );

        let entry = AuditEntry::new(
            action_types::STATUS_CHANGE,
            resource_types::APPLICATION,
            change.application_id,
        )
        .with_actor(actor.user_id())
        .with_description(format!(
            "Status changed from {} to {}",
            change.old_status,
            change.new_status.as_str()
        ))
        .with_change(
            serde_json::json!({ "status": change.old_status }),
            serde_json::json!({ "status": change.new_status.as_str(), "notes": notes }),
        );
        if let Err(e) = self.audit.record(&entry).await {
            tracing::warn!(
                application_id = change.application_id,
                error = %e,
                "Failed to record status change audit entry"
            );
        }
    }

    /// Transition history, oldest first.
    pub async fn history(
        &self,
        application_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, LifecycleError> {
        Ok(StatusHistoryRepo::list_for_application(&self.pool, application_id).await?)
    }
}

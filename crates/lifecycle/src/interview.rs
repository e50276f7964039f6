//! Interview scheduling with unique code issuance.

use std::collections::HashMap;
use std::sync::Arc;

use jobportal_core::actor::ActorContext;
use jobportal_core::audit::{action_types, resource_types, AuditEntry, AuditSink};
use jobportal_core::error::CoreError;
use jobportal_core::interview_code::{self, CodeLookup};
use jobportal_core::status::ApplicationStatus;
use jobportal_core::transition::validate_transition;
use jobportal_core::types::{DbId, Timestamp};
use jobportal_db::models::interview::{CreateInterview, Interview};
use jobportal_db::repositories::{ApplicationRepo, InterviewRepo};
use jobportal_db::DbPool;
use jobportal_events::NotificationQueue;

use crate::error::LifecycleError;
use crate::transition::StatusTransitionManager;

/// Template queued for the applicant once an interview is booked.
pub const INTERVIEW_TEMPLATE: &str = "interview_scheduled";

/// Checks candidate codes against the `interviews` table.
pub struct PgCodeLookup {
    pool: DbPool,
}

impl PgCodeLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CodeLookup for PgCodeLookup {
    async fn code_exists(&self, code: &str) -> Result<bool, CoreError> {
        InterviewRepo::code_exists(&self.pool, code)
            .await
            .map_err(|e| CoreError::Internal(format!("Interview code lookup failed: {e}")))
    }
}

pub struct InterviewScheduler {
    pool: DbPool,
    lookup: PgCodeLookup,
    transitions: Arc<StatusTransitionManager>,
    audit: Arc<dyn AuditSink>,
    queue: Option<Arc<NotificationQueue>>,
}

impl InterviewScheduler {
    pub fn new(
        pool: DbPool,
        transitions: Arc<StatusTransitionManager>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            lookup: PgCodeLookup::new(pool.clone()),
            pool,
            transitions,
            audit,
            queue: None,
        }
    }

    /// Also queue the `interview_scheduled` message for the applicant.
    pub fn with_queue(mut self, queue: Arc<NotificationQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Book an interview and move the application to
    /// `interview_scheduled`. The interview row and the transition commit
    /// together or not at all.
    pub async fn schedule_interview(
        &self,
        application_id: DbId,
        scheduled_at: Timestamp,
        location: Option<&str>,
        actor: ActorContext,
    ) -> Result<Interview, LifecycleError> {
        let actor_name = self.transitions.resolve_actor_name(actor).await?;
        let code = interview_code::generate(&self.lookup).await;

        let mut tx = self.pool.begin().await?;

        let locked = ApplicationRepo::lock_for_update(&mut tx, application_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Application",
                id: application_id,
            })?;
        validate_transition(&locked.status, ApplicationStatus::InterviewScheduled)?;

        let interview = InterviewRepo::create(
            &mut *tx,
            &CreateInterview {
                application_id,
                interview_code: code,
                scheduled_at,
                location: location.map(str::to_string),
                created_by: actor.user_id(),
            },
        )
        .await?;

        let notes = format!("Interview {} scheduled", interview.interview_code);
        let change = StatusTransitionManager::apply(
            &mut tx,
            application_id,
            ApplicationStatus::InterviewScheduled,
            Some(&notes),
            actor,
            actor_name.as_deref(),
        )
        .await?;

        tx.commit().await?;
        self.transitions.after_commit(&change, Some(&notes), actor).await;

        tracing::info!(
            application_id,
            interview_id = interview.id,
            interview_code = %interview.interview_code,
            "Interview scheduled"
        );

        if let Some(queue) = &self.queue {
            let vars = HashMap::from([
                ("application_id".to_string(), application_id.to_string()),
                ("interview_code".to_string(), interview.interview_code.clone()),
                (
                    "scheduled_at".to_string(),
                    scheduled_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                ),
                (
                    "location".to_string(),
                    location.unwrap_or("to be confirmed").to_string(),
                ),
            ]);
            if let Err(e) = queue
                .enqueue(change.applicant_id, INTERVIEW_TEMPLATE, &vars, Some(application_id))
                .await
            {
                tracing::warn!(application_id, error = %e, "Failed to queue interview notification");
            }
        }

        let entry = AuditEntry::new(
            action_types::INTERVIEW_SCHEDULED,
            resource_types::INTERVIEW,
            interview.id,
        )
        .with_actor(actor.user_id())
        .with_description(notes)
        .with_change(
            serde_json::Value::Null,
            serde_json::json!({
                "application_id": application_id,
                "interview_code": interview.interview_code,
                "scheduled_at": interview.scheduled_at,
            }),
        );
        if let Err(e) = self.audit.record(&entry).await {
            tracing::warn!(application_id, error = %e, "Failed to record interview audit entry");
        }

        Ok(interview)
    }

    pub async fn list_for_application(
        &self,
        application_id: DbId,
    ) -> Result<Vec<Interview>, LifecycleError> {
        Ok(InterviewRepo::list_for_application(&self.pool, application_id).await?)
    }
}

//! Administration of eligibility criteria.

use std::sync::Arc;

use jobportal_core::actor::ActorContext;
use jobportal_core::audit::{action_types, resource_types, AuditEntry, AuditSink};
use jobportal_core::eligibility::CriterionDefinition;
use jobportal_core::error::CoreError;
use jobportal_core::types::DbId;
use jobportal_db::models::criterion::CriterionRow;
use jobportal_db::repositories::CriteriaRepo;
use jobportal_db::DbPool;

use crate::error::LifecycleError;

pub struct CriteriaService {
    pool: DbPool,
    audit: Arc<dyn AuditSink>,
}

impl CriteriaService {
    pub fn new(pool: DbPool, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, audit }
    }

    pub async fn create(
        &self,
        input: &CriterionDefinition,
        actor: ActorContext,
    ) -> Result<CriterionRow, LifecycleError> {
        input.check()?;
        let row = CriteriaRepo::create(&self.pool, input).await?;
        self.record(row.id, actor, "Criterion created", serde_json::Value::Null, &row)
            .await;
        Ok(row)
    }

    /// Replace the definition of an existing criterion.
    pub async fn update(
        &self,
        id: DbId,
        input: &CriterionDefinition,
        actor: ActorContext,
    ) -> Result<CriterionRow, LifecycleError> {
        input.check()?;
        let before = self.find(id).await?;
        let row = CriteriaRepo::update(&self.pool, id, input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Eligibility criterion",
                id,
            })?;
        let old = serde_json::to_value(&before).unwrap_or_default();
        self.record(id, actor, "Criterion updated", old, &row).await;
        Ok(row)
    }

    /// Inactive criteria are skipped by every later eligibility run.
    pub async fn set_active(
        &self,
        id: DbId,
        is_active: bool,
        actor: ActorContext,
    ) -> Result<CriterionRow, LifecycleError> {
        let before = self.find(id).await?;
        CriteriaRepo::set_active(&self.pool, id, is_active).await?;
        let row = self.find(id).await?;
        let description = if is_active {
            "Criterion activated"
        } else {
            "Criterion deactivated"
        };
        let old = serde_json::json!({ "is_active": before.is_active });
        self.record(id, actor, description, old, &row).await;
        Ok(row)
    }

    pub async fn list_active(&self) -> Result<Vec<CriterionRow>, LifecycleError> {
        Ok(CriteriaRepo::list_active(&self.pool).await?)
    }

    async fn find(&self, id: DbId) -> Result<CriterionRow, LifecycleError> {
        CriteriaRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Eligibility criterion",
                    id,
                }
                .into()
            })
    }

    async fn record(
        &self,
        id: DbId,
        actor: ActorContext,
        description: &str,
        old: serde_json::Value,
        new: &CriterionRow,
    ) {
        let entry = AuditEntry::new(action_types::CRITERIA_CHANGE, resource_types::CRITERION, id)
            .with_actor(actor.user_id())
            .with_description(description)
            .with_change(old, serde_json::to_value(new).unwrap_or_default());
        if let Err(e) = self.audit.record(&entry).await {
            tracing::warn!(criterion_id = id, error = %e, "Failed to record criteria audit entry");
        }
    }
}

//! Eligibility engine: evaluates an application against the applicable
//! criteria and persists both the per-criterion rows and the aggregate.

use std::sync::Arc;

use futures::future::try_join_all;
use jobportal_core::audit::{action_types, resource_types, AuditEntry, AuditSink, NoopAuditSink};
use jobportal_core::eligibility::{
    applicable_criteria, evaluate_application, EligibilityCriterion, EligibilitySummary,
    EvaluationContext, EvaluatorRegistry,
};
use jobportal_core::error::CoreError;
use jobportal_core::types::DbId;
use jobportal_db::models::check_result::EligibilityCheckResult;
use jobportal_db::repositories::{ApplicationRepo, CheckResultRepo, CriteriaRepo};
use jobportal_db::DbPool;

use crate::error::LifecycleError;

pub struct EligibilityEngine {
    pool: DbPool,
    registry: EvaluatorRegistry,
    audit: Arc<dyn AuditSink>,
}

impl EligibilityEngine {
    /// Engine with the built-in evaluators and no audit trail.
    pub fn new(pool: DbPool) -> Self {
        Self::with_registry(pool, EvaluatorRegistry::with_builtin())
    }

    pub fn with_registry(pool: DbPool, registry: EvaluatorRegistry) -> Self {
        Self {
            pool,
            registry,
            audit: Arc::new(NoopAuditSink),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Evaluate the application as of today.
    pub async fn run_eligibility_checks(
        &self,
        application_id: DbId,
    ) -> Result<EligibilitySummary, LifecycleError> {
        self.run_eligibility_checks_at(application_id, &EvaluationContext::now())
            .await
    }

    /// Evaluate the application against every applicable active criterion.
    ///
    /// Check results are upserted concurrently; the aggregate is written
    /// only after all of them succeed. A failed upsert aborts the run and
    /// leaves the aggregate untouched, though rows already upserted stay.
    pub async fn run_eligibility_checks_at(
        &self,
        application_id: DbId,
        ctx: &EvaluationContext,
    ) -> Result<EligibilitySummary, LifecycleError> {
        let application = ApplicationRepo::find_by_id(&self.pool, application_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Application",
                id: application_id,
            })?;

        let active: Vec<EligibilityCriterion> = CriteriaRepo::list_active(&self.pool)
            .await?
            .into_iter()
            .map(EligibilityCriterion::from)
            .collect();
        let criteria = applicable_criteria(active, &application.preferred_departments);

        let report = evaluate_application(&self.registry, &application.profile(), &criteria, ctx);

        try_join_all(report.outcomes.iter().map(|o| {
            CheckResultRepo::upsert(&self.pool, application_id, o.criterion_id, &o.outcome)
        }))
        .await?;

        let summary = report.summary;
        let found =
            ApplicationRepo::set_eligibility(&self.pool, application_id, summary.status(), &summary.notes())
                .await?;
        if !found {
            return Err(CoreError::NotFound {
                entity: "Application",
                id: application_id,
            }
            .into());
        }

        tracing::info!(
            application_id,
            criteria = criteria.len(),
            eligible = summary.eligible,
            score = summary.score,
            max_score = summary.max_score,
            "Eligibility checks completed"
        );

        let entry = AuditEntry::new(
            action_types::ELIGIBILITY_CHECK,
            resource_types::APPLICATION,
            application_id,
        )
        .with_description(summary.notes())
        .with_change(
            serde_json::json!({ "eligibility_status": application.eligibility_status }),
            serde_json::json!({
                "eligibility_status": summary.status().as_str(),
                "score": summary.score,
                "max_score": summary.max_score,
                "percentage": summary.percentage,
            }),
        );
        if let Err(e) = self.audit.record(&entry).await {
            tracing::warn!(application_id, error = %e, "Failed to record eligibility audit entry");
        }

        Ok(summary)
    }

    /// Persisted per-criterion results of the last run.
    pub async fn list_results(
        &self,
        application_id: DbId,
    ) -> Result<Vec<EligibilityCheckResult>, LifecycleError> {
        Ok(CheckResultRepo::list_for_application(&self.pool, application_id).await?)
    }
}

//! Eligibility evaluation engine.
//!
//! Provides criterion types, the per-type evaluator registry and score
//! aggregation, all without database dependencies. The lifecycle crate
//! loads the rows, calls [`evaluate_application`] and persists the report.

pub mod criteria;
pub mod evaluator;
pub mod scoring;

use serde::Serialize;

pub use criteria::{
    applicable_criteria, ApplicantProfile, CriteriaType, CriterionDefinition,
    EligibilityCriterion, Operator, RequiredValue,
};
pub use evaluator::{
    CheckOutcome, CriterionEvaluator, EvaluationContext, EvaluationFault, EvaluatorRegistry,
    Verdict,
};
pub use scoring::{EligibilitySummary, EligibilityTally};

use crate::types::DbId;

/// One criterion's outcome tagged with the criterion it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct CriterionOutcome {
    pub criterion_id: DbId,
    pub outcome: CheckOutcome,
}

/// Per-criterion outcomes plus the aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub outcomes: Vec<CriterionOutcome>,
    pub summary: EligibilitySummary,
}

/// Evaluate every criterion against the profile and aggregate the result.
///
/// The caller is responsible for passing only applicable criteria (see
/// [`applicable_criteria`]).
pub fn evaluate_application(
    registry: &EvaluatorRegistry,
    profile: &ApplicantProfile,
    criteria: &[EligibilityCriterion],
    ctx: &EvaluationContext,
) -> EligibilityReport {
    let mut tally = EligibilityTally::new();
    let outcomes = criteria
        .iter()
        .map(|criterion| {
            let outcome = registry.evaluate(profile, criterion, ctx);
            tally.record(criterion, &outcome);
            CriterionOutcome {
                criterion_id: criterion.id,
                outcome,
            }
        })
        .collect();

    EligibilityReport {
        outcomes,
        summary: tally.summary(),
    }
}

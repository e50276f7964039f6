//! Aggregation of per-criterion outcomes into an eligibility summary.

use serde::Serialize;

use super::criteria::EligibilityCriterion;
use super::evaluator::CheckOutcome;
use crate::status::{CheckResult, EligibilityStatus};

/// Aggregate outcome of an eligibility run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EligibilitySummary {
    pub eligible: bool,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

impl EligibilitySummary {
    pub fn status(&self) -> EligibilityStatus {
        if self.eligible {
            EligibilityStatus::Eligible
        } else {
            EligibilityStatus::NotEligible
        }
    }

    /// Text stored in `applications.eligibility_notes`.
    pub fn notes(&self) -> String {
        format!(
            "Eligibility Score: {}/{}",
            format_score(self.score),
            format_score(self.max_score)
        )
    }
}

/// Running totals while criteria are evaluated.
#[derive(Debug, Clone)]
pub struct EligibilityTally {
    score: f64,
    max_score: f64,
    eligible: bool,
}

impl Default for EligibilityTally {
    fn default() -> Self {
        Self {
            score: 0.0,
            max_score: 0.0,
            eligible: true,
        }
    }
}

impl EligibilityTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one criterion's outcome. Only a failed mandatory criterion
    /// flips eligibility; pending outcomes never do.
    pub fn record(&mut self, criterion: &EligibilityCriterion, outcome: &CheckOutcome) {
        self.score += outcome.score;
        self.max_score += criterion.weight;
        if criterion.is_mandatory && outcome.result == CheckResult::Fail {
            self.eligible = false;
        }
    }

    pub fn summary(&self) -> EligibilitySummary {
        EligibilitySummary {
            eligible: self.eligible,
            score: self.score,
            max_score: self.max_score,
            percentage: percentage(self.score, self.max_score),
        }
    }
}

/// `score / max_score` as a percentage rounded to two decimals; 0 when
/// nothing could be scored.
pub fn percentage(score: f64, max_score: f64) -> f64 {
    if max_score <= 0.0 {
        return 0.0;
    }
    (score / max_score * 100.0 * 100.0).round() / 100.0
}

/// Render a score without a trailing `.0` for whole numbers.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::criteria::{CriteriaType, Operator, RequiredValue};

    fn criterion(weight: f64, is_mandatory: bool) -> EligibilityCriterion {
        EligibilityCriterion {
            id: 1,
            name: "c".into(),
            criteria_type: CriteriaType::YearsExperience,
            operator: Operator::GreaterEqual,
            required_value: RequiredValue::Number(1.0),
            weight,
            is_mandatory,
            is_active: true,
            department_id: None,
        }
    }

    fn outcome(result: CheckResult, score: f64) -> CheckOutcome {
        CheckOutcome {
            result,
            actual_value: String::new(),
            score,
            notes: String::new(),
        }
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(20.0, 70.0), 28.57);
        assert_eq!(percentage(70.0, 70.0), 100.0);
    }

    #[test]
    fn zero_max_score_gives_zero_percentage() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        let summary = EligibilityTally::new().summary();
        assert!(summary.eligible);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn mandatory_failure_forces_ineligible() {
        let mut tally = EligibilityTally::new();
        tally.record(&criterion(10.0, true), &outcome(CheckResult::Fail, 0.0));
        tally.record(&criterion(90.0, false), &outcome(CheckResult::Pass, 90.0));
        let summary = tally.summary();
        assert!(!summary.eligible);
        assert_eq!(summary.score, 90.0);
        assert_eq!(summary.max_score, 100.0);
        assert_eq!(summary.status(), EligibilityStatus::NotEligible);
    }

    #[test]
    fn optional_failure_only_lowers_score() {
        let mut tally = EligibilityTally::new();
        tally.record(&criterion(10.0, false), &outcome(CheckResult::Fail, 0.0));
        tally.record(&criterion(10.0, true), &outcome(CheckResult::Pass, 10.0));
        let summary = tally.summary();
        assert!(summary.eligible);
        assert_eq!(summary.percentage, 50.0);
    }

    #[test]
    fn pending_mandatory_does_not_flip() {
        let mut tally = EligibilityTally::new();
        tally.record(&criterion(10.0, true), &outcome(CheckResult::Pending, 0.0));
        assert!(tally.summary().eligible);
    }

    #[test]
    fn notes_format() {
        let summary = EligibilitySummary {
            eligible: false,
            score: 20.0,
            max_score: 70.0,
            percentage: 28.57,
        };
        assert_eq!(summary.notes(), "Eligibility Score: 20/70");
        assert_eq!(format_score(12.5), "12.50");
    }
}

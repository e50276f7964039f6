//! Criterion evaluator registry: pure logic, no database access.
//!
//! Each criteria type maps to one [`CriterionEvaluator`]. The registry
//! turns whatever an evaluator produces (a verdict, a fault or a panic)
//! into a [`CheckOutcome`], so one broken criterion never aborts a batch.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::criteria::{ApplicantProfile, CriteriaType, EligibilityCriterion, Operator};
use crate::status::CheckResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs that are not part of the application or criterion.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext {
    /// Date ages are computed against.
    pub today: NaiveDate,
}

impl EvaluationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn now() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }
}

/// What an evaluator concluded about one criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    /// Observed applicant value, stringified for storage.
    pub actual_value: String,
    /// Description of what was required, used in notes.
    pub expected: String,
}

/// A reason an evaluator could not reach a verdict.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvaluationFault {
    #[error("{field} is not provided")]
    MissingValue { field: &'static str },

    #[error("{field} '{value}' could not be parsed")]
    Unparseable { field: &'static str, value: String },

    #[error("operator '{operator}' is not supported for {criteria_type}")]
    UnsupportedOperator {
        criteria_type: String,
        operator: String,
    },

    #[error("invalid requirement: {0}")]
    InvalidRequirement(String),
}

/// Result of evaluating one criterion, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub result: CheckResult,
    pub actual_value: String,
    pub score: f64,
    pub notes: String,
}

/// Capability implemented once per criteria type.
pub trait CriterionEvaluator: Send + Sync {
    fn evaluate(
        &self,
        profile: &ApplicantProfile,
        criterion: &EligibilityCriterion,
        ctx: &EvaluationContext,
    ) -> Result<Verdict, EvaluationFault>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Evaluators keyed by criteria type.
pub struct EvaluatorRegistry {
    evaluators: HashMap<CriteriaType, Box<dyn CriterionEvaluator>>,
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl EvaluatorRegistry {
    /// A registry with no evaluators; every criterion evaluates to pending.
    pub fn empty() -> Self {
        Self {
            evaluators: HashMap::new(),
        }
    }

    /// A registry with the education, experience, age and field evaluators.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(CriteriaType::EducationLevel, EducationLevelEvaluator);
        registry.register(CriteriaType::YearsExperience, YearsExperienceEvaluator);
        registry.register(CriteriaType::AgeRange, AgeRangeEvaluator);
        registry.register(CriteriaType::FieldOfStudy, FieldOfStudyEvaluator);
        registry
    }

    /// Add or replace the evaluator for a criteria type.
    pub fn register(
        &mut self,
        criteria_type: CriteriaType,
        evaluator: impl CriterionEvaluator + 'static,
    ) {
        self.evaluators.insert(criteria_type, Box::new(evaluator));
    }

    pub fn supports(&self, criteria_type: &CriteriaType) -> bool {
        self.evaluators.contains_key(criteria_type)
    }

    /// Evaluate one criterion. Never fails: faults become `fail` outcomes
    /// and unregistered types become `pending`.
    pub fn evaluate(
        &self,
        profile: &ApplicantProfile,
        criterion: &EligibilityCriterion,
        ctx: &EvaluationContext,
    ) -> CheckOutcome {
        let Some(evaluator) = self.evaluators.get(&criterion.criteria_type) else {
            return CheckOutcome {
                result: CheckResult::Pending,
                actual_value: String::new(),
                score: 0.0,
                notes: format!(
                    "Criteria type '{}' not implemented.",
                    criterion.criteria_type
                ),
            };
        };

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            evaluator.evaluate(profile, criterion, ctx)
        }));

        match attempt {
            Ok(Ok(verdict)) if verdict.passed => CheckOutcome {
                result: CheckResult::Pass,
                actual_value: verdict.actual_value,
                score: criterion.weight,
                notes: format!("Requirement met: {}", verdict.expected),
            },
            Ok(Ok(verdict)) => CheckOutcome {
                result: CheckResult::Fail,
                notes: format!(
                    "Expected {}, actual {}",
                    verdict.expected, verdict.actual_value
                ),
                actual_value: verdict.actual_value,
                score: 0.0,
            },
            Ok(Err(fault)) => fault_outcome(fault.to_string()),
            Err(payload) => fault_outcome(panic_message(payload.as_ref())),
        }
    }
}

fn fault_outcome(reason: String) -> CheckOutcome {
    CheckOutcome {
        result: CheckResult::Fail,
        actual_value: "N/A".to_string(),
        score: 0.0,
        notes: format!("Evaluation error: {reason}"),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure".to_string()
    }
}

fn unsupported(criterion: &EligibilityCriterion) -> EvaluationFault {
    EvaluationFault::UnsupportedOperator {
        criteria_type: criterion.criteria_type.to_string(),
        operator: criterion.operator.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Education level
// ---------------------------------------------------------------------------

/// Ordinal rank of an education level; unknown levels rank 0.
pub fn education_rank(level: &str) -> u8 {
    let normalized = level.trim().to_lowercase().replace([' ', '-'], "_");
    match normalized.as_str() {
        "high_school" => 1,
        "diploma" => 2,
        "bachelor" => 3,
        "master" => 4,
        "phd" => 5,
        _ => 0,
    }
}

pub struct EducationLevelEvaluator;

impl CriterionEvaluator for EducationLevelEvaluator {
    fn evaluate(
        &self,
        profile: &ApplicantProfile,
        criterion: &EligibilityCriterion,
        _ctx: &EvaluationContext,
    ) -> Result<Verdict, EvaluationFault> {
        if criterion.operator != Operator::GreaterEqual {
            return Err(unsupported(criterion));
        }

        let (required_label, required_rank) = match criterion.required_value.as_text() {
            Some(level) => (level.to_string(), education_rank(level)),
            None => {
                let rank = criterion.required_value.as_number().ok_or_else(|| {
                    EvaluationFault::InvalidRequirement(
                        "education level must be a level name or rank".into(),
                    )
                })?;
                (rank.to_string(), rank as u8)
            }
        };
        let actual = profile.education_level.clone().unwrap_or_default();
        let actual_rank = education_rank(&actual);

        Ok(Verdict {
            passed: actual_rank >= required_rank,
            actual_value: if actual.is_empty() {
                "not provided".to_string()
            } else {
                actual
            },
            expected: format!("education level {required_label} or higher"),
        })
    }
}

// ---------------------------------------------------------------------------
// Years of experience
// ---------------------------------------------------------------------------

pub struct YearsExperienceEvaluator;

impl CriterionEvaluator for YearsExperienceEvaluator {
    fn evaluate(
        &self,
        profile: &ApplicantProfile,
        criterion: &EligibilityCriterion,
        _ctx: &EvaluationContext,
    ) -> Result<Verdict, EvaluationFault> {
        if criterion.operator != Operator::GreaterEqual {
            return Err(unsupported(criterion));
        }
        let required = criterion.required_value.as_number().ok_or_else(|| {
            EvaluationFault::InvalidRequirement("years of experience must be numeric".into())
        })?;
        // An empty experience field counts as no experience.
        let years = profile.years_of_experience.unwrap_or(0);

        Ok(Verdict {
            passed: f64::from(years) >= required,
            actual_value: years.to_string(),
            expected: format!("at least {required} years of experience"),
        })
    }
}

// ---------------------------------------------------------------------------
// Age range
// ---------------------------------------------------------------------------

/// Parse a date of birth in `YYYY-MM-DD` or RFC 3339 form.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Age in whole years on `today`.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

pub struct AgeRangeEvaluator;

impl CriterionEvaluator for AgeRangeEvaluator {
    fn evaluate(
        &self,
        profile: &ApplicantProfile,
        criterion: &EligibilityCriterion,
        ctx: &EvaluationContext,
    ) -> Result<Verdict, EvaluationFault> {
        let raw = profile
            .date_of_birth
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(EvaluationFault::MissingValue {
                field: "date of birth",
            })?;
        let dob = parse_date_of_birth(raw).ok_or_else(|| EvaluationFault::Unparseable {
            field: "date of birth",
            value: raw.to_string(),
        })?;
        let required = criterion.required_value.as_number().ok_or_else(|| {
            EvaluationFault::InvalidRequirement("age limit must be numeric".into())
        })?;

        let age = age_in_years(dob, ctx.today);
        let (passed, expected) = match criterion.operator {
            Operator::GreaterEqual => (f64::from(age) >= required, format!("age at least {required}")),
            Operator::LessEqual => (f64::from(age) <= required, format!("age at most {required}")),
            _ => return Err(unsupported(criterion)),
        };

        Ok(Verdict {
            passed,
            actual_value: age.to_string(),
            expected,
        })
    }
}

// ---------------------------------------------------------------------------
// Field of study
// ---------------------------------------------------------------------------

pub struct FieldOfStudyEvaluator;

impl CriterionEvaluator for FieldOfStudyEvaluator {
    fn evaluate(
        &self,
        profile: &ApplicantProfile,
        criterion: &EligibilityCriterion,
        _ctx: &EvaluationContext,
    ) -> Result<Verdict, EvaluationFault> {
        if criterion.operator != Operator::Contains {
            return Err(unsupported(criterion));
        }
        let required = criterion.required_value.as_list();
        if required.is_empty() {
            return Err(EvaluationFault::InvalidRequirement(
                "field of study list is empty".into(),
            ));
        }

        let actual = profile
            .field_of_study
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        let haystack = actual.to_lowercase();
        let passed = !haystack.is_empty()
            && required
                .iter()
                .any(|needle| haystack.contains(&needle.to_lowercase()));

        Ok(Verdict {
            passed,
            actual_value: if actual.is_empty() {
                "not provided".to_string()
            } else {
                actual.to_string()
            },
            expected: format!("field of study matching one of: {}", required.join(", ")),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

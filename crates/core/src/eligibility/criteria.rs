//! Eligibility criterion and applicant snapshot types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Criteria type
// ---------------------------------------------------------------------------

/// What attribute of the application a criterion inspects.
///
/// Codes that this build does not know are kept in [`CriteriaType::Other`]
/// so the registry can still report them as not implemented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaType {
    EducationLevel,
    YearsExperience,
    AgeRange,
    FieldOfStudy,
    Other(String),
}

impl CriteriaType {
    pub fn parse(code: &str) -> Self {
        match code {
            "education_level" => Self::EducationLevel,
            "years_experience" => Self::YearsExperience,
            "age_range" => Self::AgeRange,
            "field_of_study" => Self::FieldOfStudy,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::EducationLevel => "education_level",
            Self::YearsExperience => "years_experience",
            Self::AgeRange => "age_range",
            Self::FieldOfStudy => "field_of_study",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Comparison applied between the applicant's value and the requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    GreaterEqual,
    LessEqual,
    Contains,
    Other(String),
}

impl Operator {
    pub fn parse(code: &str) -> Self {
        match code {
            "greater_equal" => Self::GreaterEqual,
            "less_equal" => Self::LessEqual,
            "contains" => Self::Contains,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::GreaterEqual => "greater_equal",
            Self::LessEqual => "less_equal",
            Self::Contains => "contains",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Required value
// ---------------------------------------------------------------------------

/// Typed form of the `required_value` JSONB column.
#[derive(Debug, Clone, PartialEq)]
pub enum RequiredValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    Missing,
}

impl RequiredValue {
    /// Decode a stored JSON payload. Objects, booleans and null decode to
    /// [`RequiredValue::Missing`]; lists keep only their scalar entries.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Missing),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Self::Missing,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => serde_json::json!(n),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => serde_json::json!(items),
            Self::Missing => Value::Null,
        }
    }

    /// Numeric requirement; numeric strings are accepted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// List requirement; a plain string is split on commas.
    pub fn as_list(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            Self::List(items) => items.clone(),
            Self::Text(s) => s.split(',').map(str::to_string).collect(),
            Self::Number(n) => vec![n.to_string()],
            Self::Missing => Vec::new(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for RequiredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Missing => f.write_str("(none)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Criterion
// ---------------------------------------------------------------------------

/// A weighted eligibility rule, decoded from its database row.
#[derive(Debug, Clone)]
pub struct EligibilityCriterion {
    pub id: DbId,
    pub name: String,
    pub criteria_type: CriteriaType,
    pub operator: Operator,
    pub required_value: RequiredValue,
    pub weight: f64,
    pub is_mandatory: bool,
    pub is_active: bool,
    /// `None` applies the criterion to every department.
    pub department_id: Option<DbId>,
}

impl EligibilityCriterion {
    /// Whether this criterion counts for an application preferring the
    /// given departments.
    pub fn applies_to(&self, preferred_departments: &[DbId]) -> bool {
        self.is_active
            && self
                .department_id
                .map_or(true, |dept| preferred_departments.contains(&dept))
    }
}

/// Keep only the criteria that apply to the given preferred departments.
pub fn applicable_criteria(
    criteria: Vec<EligibilityCriterion>,
    preferred_departments: &[DbId],
) -> Vec<EligibilityCriterion> {
    criteria
        .into_iter()
        .filter(|c| c.applies_to(preferred_departments))
        .collect()
}

/// Input for creating or replacing a criterion definition.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CriterionDefinition {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub criteria_type: String,
    #[validate(length(min = 1, max = 30))]
    pub operator: String,
    pub required_value: Value,
    #[validate(range(min = 0.0))]
    pub weight: f64,
    #[serde(default)]
    pub is_mandatory: bool,
    pub department_id: Option<DbId>,
}

impl CriterionDefinition {
    /// Validate field bounds and that the requirement payload is usable.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if !self.weight.is_finite() {
            return Err(CoreError::Validation("weight must be a finite number".into()));
        }
        if RequiredValue::from_json(&self.required_value) == RequiredValue::Missing {
            return Err(CoreError::Validation(
                "required_value must be a number, string or list".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Applicant snapshot
// ---------------------------------------------------------------------------

/// The application fields criteria are evaluated against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub education_level: Option<String>,
    pub field_of_study: Option<String>,
    pub years_of_experience: Option<i32>,
    /// Stored as captured by the application form; parsed during evaluation.
    pub date_of_birth: Option<String>,
    pub preferred_departments: Vec<DbId>,
}

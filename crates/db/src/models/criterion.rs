//! Eligibility criterion entity model.

use jobportal_core::eligibility::{CriteriaType, EligibilityCriterion, Operator, RequiredValue};
use jobportal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `eligibility_criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CriterionRow {
    pub id: DbId,
    pub name: String,
    pub criteria_type: String,
    pub operator: String,
    pub required_value: serde_json::Value,
    pub weight: f64,
    pub is_mandatory: bool,
    pub is_active: bool,
    pub department_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CriterionRow {
    /// Decode the stored codes and JSON payload into the typed criterion.
    pub fn to_criterion(&self) -> EligibilityCriterion {
        EligibilityCriterion {
            id: self.id,
            name: self.name.clone(),
            criteria_type: CriteriaType::parse(&self.criteria_type),
            operator: Operator::parse(&self.operator),
            required_value: RequiredValue::from_json(&self.required_value),
            weight: self.weight,
            is_mandatory: self.is_mandatory,
            is_active: self.is_active,
            department_id: self.department_id,
        }
    }
}

impl From<CriterionRow> for EligibilityCriterion {
    fn from(row: CriterionRow) -> Self {
        row.to_criterion()
    }
}

//! Eligibility check result model.

use jobportal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `eligibility_check_results` table. Unique on
/// `(application_id, criterion_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EligibilityCheckResult {
    pub id: DbId,
    pub application_id: DbId,
    pub criterion_id: DbId,
    pub result: String,
    pub actual_value: Option<String>,
    pub score: f64,
    pub notes: Option<String>,
    pub checked_at: Timestamp,
}

//! Repository for the `eligibility_check_results` table.

use jobportal_core::eligibility::CheckOutcome;
use jobportal_core::types::DbId;
use sqlx::PgPool;

use crate::models::check_result::EligibilityCheckResult;

/// Column list for `eligibility_check_results` queries.
const COLUMNS: &str =
    "id, application_id, criterion_id, result, actual_value, score, notes, checked_at";

/// Provides upsert and query operations for eligibility check results.
pub struct CheckResultRepo;

impl CheckResultRepo {
    /// Insert or overwrite the result for `(application_id, criterion_id)`.
    pub async fn upsert(
        pool: &PgPool,
        application_id: DbId,
        criterion_id: DbId,
        outcome: &CheckOutcome,
    ) -> Result<EligibilityCheckResult, sqlx::Error> {
        let query = format!(
            "INSERT INTO eligibility_check_results \
                (application_id, criterion_id, result, actual_value, score, notes, checked_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
             ON CONFLICT ON CONSTRAINT uq_eligibility_check_results_application_criterion \
             DO UPDATE SET \
                result = EXCLUDED.result, \
                actual_value = EXCLUDED.actual_value, \
                score = EXCLUDED.score, \
                notes = EXCLUDED.notes, \
                checked_at = EXCLUDED.checked_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EligibilityCheckResult>(&query)
            .bind(application_id)
            .bind(criterion_id)
            .bind(outcome.result.as_str())
            .bind(&outcome.actual_value)
            .bind(outcome.score)
            .bind(&outcome.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<EligibilityCheckResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM eligibility_check_results \
             WHERE application_id = $1 ORDER BY criterion_id"
        );
        sqlx::query_as::<_, EligibilityCheckResult>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }
}

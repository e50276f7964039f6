//! Repository for the `interviews` table.

use jobportal_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::interview::{CreateInterview, Interview};

const COLUMNS: &str =
    "id, application_id, interview_code, scheduled_at, location, created_by, created_at";

pub struct InterviewRepo;

impl InterviewRepo {
    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM interviews WHERE interview_code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await
    }

    /// Insert an interview. A duplicate code surfaces as a unique
    /// violation on `uq_interviews_interview_code`.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateInterview,
    ) -> Result<Interview, sqlx::Error> {
        let query = format!(
            "INSERT INTO interviews \
                (application_id, interview_code, scheduled_at, location, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Interview>(&query)
            .bind(input.application_id)
            .bind(&input.interview_code)
            .bind(input.scheduled_at)
            .bind(&input.location)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
    }

    pub async fn list_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<Interview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interviews WHERE application_id = $1 \
             ORDER BY scheduled_at ASC, id ASC"
        );
        sqlx::query_as::<_, Interview>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }
}

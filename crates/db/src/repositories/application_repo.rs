//! Repository for the `applications` table.
//!
//! `status` is only changed through [`ApplicationRepo::set_status`] inside a
//! transaction holding the row lock from [`ApplicationRepo::lock_for_update`];
//! `eligibility_status` only through [`ApplicationRepo::set_eligibility`].

use jobportal_core::status::{ApplicationStatus, EligibilityStatus};
use jobportal_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::application::{Application, CreateApplication, UpdateApplicationDraft};

/// Column list for `applications` queries.
const COLUMNS: &str = "\
    id, user_id, status, eligibility_status, eligibility_notes, \
    preferred_departments, education_level, field_of_study, \
    years_of_experience, date_of_birth, submitted_at, created_at, updated_at";

/// Current status and owner of a locked application row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LockedApplication {
    pub status: String,
    pub user_id: DbId,
}

/// Provides CRUD operations for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Create a draft application owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications \
                (user_id, status, preferred_departments, education_level, \
                 field_of_study, years_of_experience, date_of_birth) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .bind(ApplicationStatus::Draft.as_str())
            .bind(&input.preferred_departments)
            .bind(&input.education_level)
            .bind(&input.field_of_study)
            .bind(input.years_of_experience)
            .bind(&input.date_of_birth)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply applicant edits. Only drafts can be edited; returns `None`
    /// when the application does not exist or is no longer a draft.
    pub async fn update_draft(
        pool: &PgPool,
        id: DbId,
        input: &UpdateApplicationDraft,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET \
                preferred_departments = COALESCE($3, preferred_departments), \
                education_level = COALESCE($4, education_level), \
                field_of_study = COALESCE($5, field_of_study), \
                years_of_experience = COALESCE($6, years_of_experience), \
                date_of_birth = COALESCE($7, date_of_birth), \
                updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Draft.as_str())
            .bind(&input.preferred_departments)
            .bind(&input.education_level)
            .bind(&input.field_of_study)
            .bind(input.years_of_experience)
            .bind(&input.date_of_birth)
            .fetch_optional(pool)
            .await
    }

    /// Lock the application row for the rest of the transaction and return
    /// its current status and owner.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<LockedApplication>, sqlx::Error> {
        sqlx::query_as::<_, LockedApplication>(
            "SELECT status, user_id FROM applications WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Write a new status. The first transition to `submitted` also stamps
    /// `submitted_at`.
    pub async fn set_status(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE applications \
             SET status = $2, \
                 submitted_at = CASE WHEN $2 = $3 THEN COALESCE(submitted_at, NOW()) \
                                     ELSE submitted_at END, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(ApplicationStatus::Submitted.as_str())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Store the aggregate eligibility outcome.
    ///
    /// Returns `false` if the application no longer exists.
    pub async fn set_eligibility(
        pool: &PgPool,
        id: DbId,
        status: EligibilityStatus,
        notes: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE applications \
             SET eligibility_status = $2, eligibility_notes = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(notes)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

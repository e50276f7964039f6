//! Repository for the `eligibility_criteria` table.

use jobportal_core::eligibility::CriterionDefinition;
use jobportal_core::types::DbId;
use sqlx::PgPool;

use crate::models::criterion::CriterionRow;

/// Column list for `eligibility_criteria` queries.
const COLUMNS: &str = "\
    id, name, criteria_type, operator, required_value, weight, \
    is_mandatory, is_active, department_id, created_at, updated_at";

/// Provides CRUD operations for eligibility criteria.
pub struct CriteriaRepo;

impl CriteriaRepo {
    /// Insert a new active criterion. The definition must already have
    /// passed [`CriterionDefinition::check`].
    pub async fn create(
        pool: &PgPool,
        input: &CriterionDefinition,
    ) -> Result<CriterionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO eligibility_criteria \
                (name, criteria_type, operator, required_value, weight, is_mandatory, department_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(&input.name)
            .bind(&input.criteria_type)
            .bind(&input.operator)
            .bind(&input.required_value)
            .bind(input.weight)
            .bind(input.is_mandatory)
            .bind(input.department_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CriterionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM eligibility_criteria WHERE id = $1");
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All active criteria, in a stable order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<CriterionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM eligibility_criteria WHERE is_active = true ORDER BY id"
        );
        sqlx::query_as::<_, CriterionRow>(&query).fetch_all(pool).await
    }

    /// Replace a criterion's definition, keeping its active flag.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CriterionDefinition,
    ) -> Result<Option<CriterionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE eligibility_criteria SET \
                name = $2, criteria_type = $3, operator = $4, required_value = $5, \
                weight = $6, is_mandatory = $7, department_id = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.criteria_type)
            .bind(&input.operator)
            .bind(&input.required_value)
            .bind(input.weight)
            .bind(input.is_mandatory)
            .bind(input.department_id)
            .fetch_optional(pool)
            .await
    }

    /// Activate or deactivate a criterion. Returns `true` if a row changed.
    pub async fn set_active(pool: &PgPool, id: DbId, is_active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE eligibility_criteria SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

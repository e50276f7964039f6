//! Interview entity model and DTOs.

use jobportal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `interviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interview {
    pub id: DbId,
    pub application_id: DbId,
    pub interview_code: String,
    pub scheduled_at: Timestamp,
    pub location: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for scheduling an interview. The code is issued by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInterview {
    pub application_id: DbId,
    pub interview_code: String,
    pub scheduled_at: Timestamp,
    pub location: Option<String>,
    pub created_by: Option<DbId>,
}

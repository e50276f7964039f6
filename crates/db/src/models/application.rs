//! Application entity model and DTOs.

use jobportal_core::eligibility::ApplicantProfile;
use jobportal_core::error::CoreError;
use jobportal_core::status::{ApplicationStatus, EligibilityStatus};
use jobportal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub eligibility_status: String,
    pub eligibility_notes: Option<String>,
    pub preferred_departments: Vec<DbId>,
    pub education_level: Option<String>,
    pub field_of_study: Option<String>,
    pub years_of_experience: Option<i32>,
    pub date_of_birth: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    /// Typed lifecycle status.
    pub fn status(&self) -> Result<ApplicationStatus, CoreError> {
        self.status.parse()
    }

    /// Typed eligibility status.
    pub fn eligibility_status(&self) -> Result<EligibilityStatus, CoreError> {
        self.eligibility_status.parse()
    }

    /// Snapshot of the fields eligibility criteria inspect.
    pub fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            education_level: self.education_level.clone(),
            field_of_study: self.field_of_study.clone(),
            years_of_experience: self.years_of_experience,
            date_of_birth: self.date_of_birth.clone(),
            preferred_departments: self.preferred_departments.clone(),
        }
    }
}

/// DTO for creating a draft application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateApplication {
    pub preferred_departments: Vec<DbId>,
    pub education_level: Option<String>,
    pub field_of_study: Option<String>,
    pub years_of_experience: Option<i32>,
    pub date_of_birth: Option<String>,
}

/// DTO for editing a draft. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplicationDraft {
    pub preferred_departments: Option<Vec<DbId>>,
    pub education_level: Option<String>,
    pub field_of_study: Option<String>,
    pub years_of_experience: Option<i32>,
    pub date_of_birth: Option<String>,
}

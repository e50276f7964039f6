//! Pure domain logic for the job portal application lifecycle.
//!
//! Nothing in this crate touches the database. Callers load rows, convert
//! them into the types defined here and hand them to the evaluation,
//! transition and templating functions.

pub mod actor;
pub mod audit;
pub mod eligibility;
pub mod error;
pub mod interview_code;
pub mod status;
pub mod template;
pub mod transition;
pub mod types;

//! Application lifecycle orchestration.
//!
//! Ties the pure rules in `jobportal-core` to the repositories in
//! `jobportal-db`:
//!
//! - [`EligibilityEngine`] evaluates and scores applications.
//! - [`StatusTransitionManager`] applies status changes transactionally.
//! - [`InterviewScheduler`] books interviews under a unique code.
//! - [`CriteriaService`] maintains the criteria the engine reads.
//! - [`PgAuditSink`] writes audit entries to `audit_logs`.

pub mod audit;
pub mod criteria;
pub mod eligibility;
pub mod error;
pub mod interview;
pub mod transition;

pub use audit::PgAuditSink;
pub use criteria::CriteriaService;
pub use eligibility::EligibilityEngine;
pub use error::LifecycleError;
pub use interview::{InterviewScheduler, PgCodeLookup};
pub use transition::{StatusChange, StatusTransitionManager};

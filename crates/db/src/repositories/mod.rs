//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must join a
//! caller's transaction take `&mut Transaction` or any `PgExecutor`.

pub mod application_repo;
pub mod audit_repo;
pub mod check_result_repo;
pub mod criteria_repo;
pub mod department_repo;
pub mod interview_repo;
pub mod notification_queue_repo;
pub mod notification_repo;
pub mod status_history_repo;
pub mod template_repo;
pub mod user_repo;

pub use application_repo::ApplicationRepo;
pub use audit_repo::AuditLogRepo;
pub use check_result_repo::CheckResultRepo;
pub use criteria_repo::CriteriaRepo;
pub use department_repo::DepartmentRepo;
pub use interview_repo::InterviewRepo;
pub use notification_queue_repo::NotificationQueueRepo;
pub use notification_repo::NotificationRepo;
pub use status_history_repo::StatusHistoryRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where the table accepts them
//! - Conversions into the typed `jobportal_core` values at the boundary

pub mod application;
pub mod audit;
pub mod check_result;
pub mod criterion;
pub mod department;
pub mod interview;
pub mod notification;
pub mod notification_queue;
pub mod status_history;
pub mod template;
pub mod user;

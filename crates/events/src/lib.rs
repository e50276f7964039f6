//! Notification delivery for the job portal.
//!
//! - [`NotificationQueue`] renders templates into queued messages and
//!   drains them through the configured transports.
//! - [`delivery`] holds the SMTP and SMS gateway transports.
//! - [`Inbox`] reads the in-app notifications written for `system` items.
//! - [`DrainScheduler`] drains the queue on an interval.

pub mod delivery;
pub mod error;
pub mod inbox;
pub mod queue;
pub mod scheduler;

pub use delivery::{
    DeliveryError, EmailConfig, EmailDelivery, SmsConfig, SmsDelivery, Transport,
};
pub use error::QueueError;
pub use inbox::Inbox;
pub use queue::{DrainReport, NotificationQueue};
pub use scheduler::DrainScheduler;

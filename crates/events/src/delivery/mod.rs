//! Outbound delivery channels for queued notifications.
//!
//! The drain loop only sees the [`Transport`] trait; SMTP and the SMS
//! gateway are wired in at startup from their `from_env` configs.

pub mod email;
pub mod sms;

use jobportal_core::status::NotificationChannel;

pub use email::{EmailConfig, EmailDelivery, EmailError};
pub use sms::{SmsConfig, SmsDelivery, SmsError};

/// Error type for any delivery channel.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Sms(#[from] SmsError),

    /// Writing the in-app inbox row failed.
    #[error("Inbox write failed: {0}")]
    Inbox(#[from] sqlx::Error),

    /// No transport is configured for the item's channel.
    #[error("No transport configured for channel '{0}'")]
    NotConfigured(NotificationChannel),

    /// Used by transports outside this crate.
    #[error("Delivery failed: {0}")]
    Other(String),
}

/// Sends one rendered message to one address.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

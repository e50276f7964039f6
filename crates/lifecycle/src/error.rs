use jobportal_core::error::CoreError;
use jobportal_events::QueueError;

/// Errors from lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any datastore fault; an open transaction is rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LifecycleError {
    /// Message safe to show an end user. Database detail is only logged.
    pub fn public_message(&self) -> String {
        match self {
            LifecycleError::Core(e) => e.public_message(),
            LifecycleError::Database(e) => {
                tracing::error!(error = %e, "Lifecycle database error");
                "A database error occurred".to_string()
            }
        }
    }
}

impl From<QueueError> for LifecycleError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Core(e) => LifecycleError::Core(e),
            QueueError::Database(e) => LifecycleError::Database(e),
        }
    }
}

use jobportal_core::error::CoreError;

/// Errors from queue and inbox operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl QueueError {
    /// Message safe to show an end user. Database detail is never exposed.
    pub fn public_message(&self) -> String {
        match self {
            QueueError::Core(e) => e.public_message(),
            QueueError::Database(_) => "A database error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_detail_is_hidden() {
        let err = QueueError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "A database error occurred");
    }

    #[test]
    fn template_errors_stay_generic() {
        let err = QueueError::from(CoreError::TemplateNotFound("welcome".into()));
        assert!(!err.public_message().contains("welcome"));
        assert!(err.to_string().contains("welcome"));
    }
}

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Message template not found or inactive: {0}")]
    TemplateNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Message safe to show an end user.
    ///
    /// Internal faults collapse to a generic sentence; the detail belongs in
    /// the logs, not in a response.
    pub fn public_message(&self) -> String {
        match self {
            CoreError::NotFound { entity, .. } => format!("{entity} not found"),
            CoreError::Validation(msg) => msg.clone(),
            CoreError::TemplateNotFound(_) | CoreError::Configuration(_) => {
                "The system is not configured to perform this action".to_string()
            }
            CoreError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Application",
            id: 42,
        };
        assert_eq!(err.to_string(), "Entity not found: Application with id 42");
        assert_eq!(err.public_message(), "Application not found");
    }

    #[test]
    fn internal_detail_is_not_public() {
        let err = CoreError::Internal("connection reset by peer".to_string());
        assert!(!err.public_message().contains("connection reset"));
    }
}

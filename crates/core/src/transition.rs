//! Status transition rules and notification wording.

use std::borrow::Cow;

use crate::actor::SYSTEM_ACTOR_NAME;
use crate::error::CoreError;
use crate::status::ApplicationStatus;

/// Subject of the system notification sent on every transition.
pub const STATUS_CHANGE_SUBJECT: &str = "Application Status Updated";

/// Label for a stored status code. Codes this build does not know are
/// shown as-is.
pub fn status_label(code: &str) -> Cow<'_, str> {
    match code.parse::<ApplicationStatus>() {
        Ok(status) => Cow::Borrowed(status.label()),
        Err(_) => Cow::Borrowed(code),
    }
}

/// Reject transitions the lifecycle does not allow.
///
/// `current` is the raw stored code so legacy values never block a
/// transition; only a terminal status does.
pub fn validate_transition(current: &str, next: ApplicationStatus) -> Result<(), CoreError> {
    match current.parse::<ApplicationStatus>() {
        Ok(status) if status.is_terminal() => Err(CoreError::Validation(format!(
            "Application is {} and can no longer change status (requested {})",
            status.label(),
            next.label()
        ))),
        _ => Ok(()),
    }
}

/// Message body for the status-change notification.
pub fn status_change_message(
    old_code: &str,
    new_status: ApplicationStatus,
    actor_name: Option<&str>,
    notes: Option<&str>,
) -> String {
    let actor = actor_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(SYSTEM_ACTOR_NAME);
    let mut message = format!(
        "Your application status has been changed from {} to {} by {actor}.",
        status_label(old_code),
        new_status.label()
    );
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        message.push_str("\n\nNotes: ");
        message.push_str(notes);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_get_labels() {
        assert_eq!(status_label("draft"), "Draft");
        assert_eq!(status_label("on_hold"), "On Hold");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(status_label("legacy_pending"), "legacy_pending");
    }

    #[test]
    fn message_names_actor_and_labels() {
        let msg = status_change_message(
            "draft",
            ApplicationStatus::Submitted,
            Some("Jane Admin"),
            None,
        );
        assert_eq!(
            msg,
            "Your application status has been changed from Draft to Submitted by Jane Admin."
        );
    }

    #[test]
    fn message_defaults_to_system_actor() {
        let msg = status_change_message("submitted", ApplicationStatus::UnderReview, None, None);
        assert!(msg.ends_with("by System."));
        let msg = status_change_message("submitted", ApplicationStatus::UnderReview, Some("  "), None);
        assert!(msg.ends_with("by System."));
    }

    #[test]
    fn message_appends_notes() {
        let msg = status_change_message(
            "under_review",
            ApplicationStatus::Rejected,
            Some("HR"),
            Some("Position filled"),
        );
        assert!(msg.contains("from Under Review to Rejected"));
        assert!(msg.ends_with("Notes: Position filled"));
    }

    #[test]
    fn withdrawn_is_final() {
        assert!(validate_transition("withdrawn", ApplicationStatus::Submitted).is_err());
        assert!(validate_transition("draft", ApplicationStatus::Withdrawn).is_ok());
        assert!(validate_transition("something_old", ApplicationStatus::Submitted).is_ok());
    }
}

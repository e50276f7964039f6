//! Identity of whoever triggers a mutating operation.
//!
//! The surrounding web layer resolves the current user and passes an
//! [`ActorContext`] into every lifecycle call. An absent actor (or the
//! legacy id `0`) means the system itself acted.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Display name used when no user is attached to an action.
pub const SYSTEM_ACTOR_NAME: &str = "System";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    user_id: Option<DbId>,
}

impl ActorContext {
    /// An action performed by the platform, not by a user.
    pub fn system() -> Self {
        Self { user_id: None }
    }

    /// An action performed by the given user.
    pub fn user(user_id: DbId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// The acting user, if any. Non-positive ids are treated as the system.
    pub fn user_id(&self) -> Option<DbId> {
        self.user_id.filter(|id| *id > 0)
    }

    pub fn is_system(&self) -> bool {
        self.user_id().is_none()
    }
}

impl From<Option<DbId>> for ActorContext {
    fn from(user_id: Option<DbId>) -> Self {
        Self { user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_is_system() {
        assert!(ActorContext::user(0).is_system());
        assert_eq!(ActorContext::from(Some(0)).user_id(), None);
    }

    #[test]
    fn real_user_is_kept() {
        let actor = ActorContext::user(7);
        assert!(!actor.is_system());
        assert_eq!(actor.user_id(), Some(7));
    }
}

//! Closed enumerations for every status and type column.
//!
//! Each enum is stored as its snake_case code in a TEXT column. The
//! `as_str` / `FromStr` pair is the only place those codes are spelled out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the code stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $code => Ok($name::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        stringify!($name),
                        [$($code),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_code_enum! {
    /// Lifecycle status of a centralized application.
    ApplicationStatus {
        Draft = "draft",
        Submitted = "submitted",
        UnderReview = "under_review",
        Shortlisted = "shortlisted",
        InterviewScheduled = "interview_scheduled",
        Interviewed = "interviewed",
        Selected = "selected",
        Rejected = "rejected",
        OnHold = "on_hold",
        Withdrawn = "withdrawn",
    }
}

impl ApplicationStatus {
    /// Human-readable label used in notifications.
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Interviewed => "Interviewed",
            ApplicationStatus::Selected => "Selected",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::OnHold => "On Hold",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// A terminal status accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Withdrawn)
    }
}

define_code_enum! {
    /// Aggregate eligibility, written only by the eligibility engine.
    EligibilityStatus {
        Pending = "pending",
        Eligible = "eligible",
        NotEligible = "not_eligible",
    }
}

define_code_enum! {
    /// Outcome of evaluating one criterion.
    CheckResult {
        Pass = "pass",
        Fail = "fail",
        Pending = "pending",
    }
}

define_code_enum! {
    /// Delivery channel of a queued notification.
    NotificationChannel {
        Email = "email",
        Sms = "sms",
        System = "system",
    }
}

define_code_enum! {
    /// Delivery state of a notification queue item.
    QueueStatus {
        Pending = "pending",
        /// Claimed by a drain run, not yet delivered.
        Processing = "processing",
        Sent = "sent",
        Failed = "failed",
    }
}

/// Reference type recorded on queue items created for applications.
pub const REFERENCE_APPLICATION: &str = "application";

//! Template-driven notification queue.
//!
//! [`NotificationQueue::enqueue`] renders a stored template for a user and
//! writes a `pending` row. [`NotificationQueue::drain`] claims due rows and
//! hands each to the transport for its channel. `system` items are
//! delivered by writing the recipient's in-app inbox.

use std::sync::Arc;

use jobportal_core::error::CoreError;
use jobportal_core::status::{NotificationChannel, REFERENCE_APPLICATION};
use jobportal_core::template::{self, TemplateVars};
use jobportal_core::types::DbId;
use jobportal_db::models::notification_queue::{NewQueueItem, NotificationQueueItem};
use jobportal_db::models::user::User;
use jobportal_db::repositories::{
    NotificationQueueRepo, NotificationRepo, TemplateRepo, UserRepo,
};
use jobportal_db::DbPool;

use crate::delivery::{DeliveryError, Transport};
use crate::error::QueueError;

/// Variable filled with the recipient's display name unless the caller
/// supplies one.
pub const RECIPIENT_NAME_VAR: &str = "recipient_name";

/// Outcome counts of one drain call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub claimed: usize,
    pub sent: usize,
    pub failed: usize,
}

impl DrainReport {
    pub fn processed(&self) -> usize {
        self.sent + self.failed
    }
}

/// Address a queue item is sent to for a given channel.
///
/// `system` items go to the inbox keyed by recipient id; the email is kept
/// as the address for reference.
pub fn recipient_address(user: &User, channel: NotificationChannel) -> Result<String, CoreError> {
    match channel {
        NotificationChannel::Email | NotificationChannel::System => Ok(user.email.clone()),
        NotificationChannel::Sms => user
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::Validation(format!("User {} has no phone number for SMS", user.id))
            }),
    }
}

pub struct NotificationQueue {
    pool: DbPool,
    email: Option<Arc<dyn Transport>>,
    sms: Option<Arc<dyn Transport>>,
}

impl NotificationQueue {
    /// A queue with no external transports. Email and SMS items fail at
    /// drain time until transports are attached.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            email: None,
            sms: None,
        }
    }

    pub fn with_email(mut self, transport: Arc<dyn Transport>) -> Self {
        self.email = Some(transport);
        self
    }

    pub fn with_sms(mut self, transport: Arc<dyn Transport>) -> Self {
        self.sms = Some(transport);
        self
    }

    /// Render `template_code` for `recipient_id` and store it as pending.
    pub async fn enqueue(
        &self,
        recipient_id: DbId,
        template_code: &str,
        variables: &TemplateVars,
        reference_id: Option<DbId>,
    ) -> Result<NotificationQueueItem, QueueError> {
        let user = UserRepo::find_by_id(&self.pool, recipient_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: recipient_id,
            })?;
        let template = TemplateRepo::find_active_by_code(&self.pool, template_code)
            .await?
            .ok_or_else(|| CoreError::TemplateNotFound(template_code.to_string()))?;
        let channel = template.channel()?;
        let address = recipient_address(&user, channel)?;

        let mut vars = variables.clone();
        vars.entry(RECIPIENT_NAME_VAR.to_string())
            .or_insert_with(|| user.full_name.clone());

        let subject = template::render(&template.subject, &vars);
        let body = template::render(&template.body, &vars);

        let mut unresolved = template::unresolved_placeholders(&subject);
        unresolved.extend(template::unresolved_placeholders(&body));
        if !unresolved.is_empty() {
            tracing::warn!(
                template_code,
                recipient_id,
                placeholders = ?unresolved,
                "Template rendered with unresolved placeholders"
            );
        }

        let item = NotificationQueueRepo::insert(
            &self.pool,
            &NewQueueItem {
                recipient_id,
                channel,
                recipient_address: address,
                subject,
                body,
                reference_type: Some(REFERENCE_APPLICATION.to_string()),
                reference_id,
                scheduled_at: None,
            },
        )
        .await?;

        tracing::debug!(queue_id = item.id, template_code, %channel, "Notification queued");
        Ok(item)
    }

    /// Claim up to `limit` due items and deliver them.
    ///
    /// Only the claim itself can fail the call. Each claimed item ends up
    /// `sent` or `failed` independently of the others. A non-positive
    /// `limit` claims nothing.
    ///
    /// `sent` counts deliveries. If recording the outcome fails afterwards
    /// the item stays `processing` and needs a manual reset.
    pub async fn drain(&self, limit: i64) -> Result<DrainReport, QueueError> {
        if limit <= 0 {
            return Ok(DrainReport::default());
        }
        let items = NotificationQueueRepo::claim_due(&self.pool, limit).await?;
        let mut report = DrainReport {
            claimed: items.len(),
            ..DrainReport::default()
        };

        for item in &items {
            match self.dispatch(item).await {
                Ok(()) => {
                    report.sent += 1;
                    if let Err(e) = NotificationQueueRepo::mark_sent(&self.pool, item.id).await {
                        tracing::error!(queue_id = item.id, error = %e, "Failed to mark notification sent");
                    }
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        queue_id = item.id,
                        channel = %item.channel,
                        error = %err,
                        "Notification delivery failed"
                    );
                    let message = err.to_string();
                    if let Err(e) =
                        NotificationQueueRepo::mark_failed(&self.pool, item.id, &message).await
                    {
                        tracing::error!(queue_id = item.id, error = %e, "Failed to mark notification failed");
                    }
                }
            }
        }

        if report.claimed > 0 {
            tracing::info!(
                claimed = report.claimed,
                sent = report.sent,
                failed = report.failed,
                "Drained notification queue"
            );
        }
        Ok(report)
    }

    async fn dispatch(&self, item: &NotificationQueueItem) -> Result<(), DeliveryError> {
        let channel = item
            .channel()
            .map_err(|e| DeliveryError::Other(e.to_string()))?;
        let transport = match channel {
            NotificationChannel::System => {
                NotificationRepo::create(
                    &self.pool,
                    item.recipient_id,
                    &item.subject,
                    &item.body,
                    item.reference_type.as_deref(),
                    item.reference_id,
                )
                .await?;
                return Ok(());
            }
            NotificationChannel::Email => self.email.as_ref(),
            NotificationChannel::Sms => self.sms.as_ref(),
        };
        let transport = transport.ok_or(DeliveryError::NotConfigured(channel))?;
        transport
            .send(&item.recipient_address, &item.subject, &item.body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(phone: Option<&str>) -> User {
        User {
            id: 7,
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            phone: phone.map(str::to_string),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn email_and_system_use_the_email_address() {
        let u = user(None);
        assert_eq!(
            recipient_address(&u, NotificationChannel::Email).unwrap(),
            "ada@example.com"
        );
        assert_eq!(
            recipient_address(&u, NotificationChannel::System).unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn sms_requires_a_phone_number() {
        assert_eq!(
            recipient_address(&user(Some(" +15550100 ")), NotificationChannel::Sms).unwrap(),
            "+15550100"
        );
        assert!(matches!(
            recipient_address(&user(Some("  ")), NotificationChannel::Sms),
            Err(CoreError::Validation(_))
        ));
        assert!(recipient_address(&user(None), NotificationChannel::Sms).is_err());
    }

    #[test]
    fn processed_counts_both_outcomes() {
        let report = DrainReport {
            claimed: 3,
            sent: 2,
            failed: 1,
        };
        assert_eq!(report.processed(), 3);
    }
}

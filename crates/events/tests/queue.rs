//! Integration tests for the notification queue.
//!
//! - Template rendering and lookup failures at enqueue time
//! - Drain routing per channel and per-item failure isolation
//! - Concurrent drains never deliver an item twice

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use jobportal_core::error::CoreError;
use jobportal_core::status::QueueStatus;
use jobportal_core::template::TemplateVars;
use jobportal_db::models::user::CreateUser;
use jobportal_db::repositories::{NotificationQueueRepo, NotificationRepo, TemplateRepo, UserRepo};
use jobportal_events::{
    DeliveryError, DrainScheduler, Inbox, NotificationQueue, QueueError, Transport,
};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Records every message instead of sending it.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingTransport {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

struct FailingTransport;

#[async_trait::async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _: &str, _: &str, _: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError::Other("gateway unavailable".to_string()))
    }
}

async fn new_user(pool: &PgPool, email: &str, phone: Option<&str>) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Grace Hopper".to_string(),
            phone: phone.map(str::to_string),
        },
    )
    .await
    .unwrap()
    .id
}

fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

// ---------------------------------------------------------------------------
// Enqueue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn enqueue_renders_template_for_recipient(pool: PgPool) {
    let user_id = new_user(&pool, "grace@example.com", None).await;
    let queue = NotificationQueue::new(pool.clone());

    let item = queue
        .enqueue(
            user_id,
            "application_status_changed",
            &vars(&[("application_id", "12"), ("status", "Shortlisted")]),
            Some(12),
        )
        .await
        .unwrap();

    assert_eq!(item.subject, "Your application is now Shortlisted");
    assert!(item.body.starts_with("Dear Grace Hopper,"));
    assert!(item.body.contains("application #12 changed to Shortlisted"));
    assert_eq!(item.recipient_address, "grace@example.com");
    assert_eq!(item.reference_type.as_deref(), Some("application"));
    assert_eq!(item.reference_id, Some(12));
    assert_eq!(item.status().unwrap(), QueueStatus::Pending);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn caller_can_override_recipient_name(pool: PgPool) {
    let user_id = new_user(&pool, "override@example.com", None).await;
    let queue = NotificationQueue::new(pool.clone());

    let item = queue
        .enqueue(
            user_id,
            "application_submitted",
            &vars(&[("recipient_name", "Dr. Hopper"), ("application_id", "3")]),
            Some(3),
        )
        .await
        .unwrap();
    assert!(item.body.starts_with("Dear Dr. Hopper,"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_or_inactive_template_is_rejected(pool: PgPool) {
    let user_id = new_user(&pool, "tpl@example.com", None).await;
    let queue = NotificationQueue::new(pool.clone());

    let err = queue
        .enqueue(user_id, "no_such_template", &TemplateVars::new(), None)
        .await
        .unwrap_err();
    assert_matches!(err, QueueError::Core(CoreError::TemplateNotFound(code)) if code == "no_such_template");

    TemplateRepo::set_active(&pool, "application_submitted", false)
        .await
        .unwrap();
    let err = queue
        .enqueue(user_id, "application_submitted", &TemplateVars::new(), None)
        .await
        .unwrap_err();
    assert_matches!(err, QueueError::Core(CoreError::TemplateNotFound(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_recipient_is_not_found(pool: PgPool) {
    let queue = NotificationQueue::new(pool.clone());
    let err = queue
        .enqueue(9999, "application_submitted", &TemplateVars::new(), None)
        .await
        .unwrap_err();
    assert_matches!(err, QueueError::Core(CoreError::NotFound { entity: "User", id: 9999 }));
}

// ---------------------------------------------------------------------------
// Drain
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn drain_routes_each_channel_and_isolates_failures(pool: PgPool) {
    let user_id = new_user(&pool, "route@example.com", Some("+15550123")).await;
    let email = Arc::new(RecordingTransport::default());
    let queue = NotificationQueue::new(pool.clone())
        .with_email(email.clone())
        .with_sms(Arc::new(FailingTransport));

    let mail = queue
        .enqueue(user_id, "application_submitted", &vars(&[("application_id", "1")]), Some(1))
        .await
        .unwrap();
    let sms = queue
        .enqueue(
            user_id,
            "interview_scheduled_sms",
            &vars(&[("interview_code", "INT-AAAA0000"), ("scheduled_at", "Monday")]),
            Some(1),
        )
        .await
        .unwrap();
    let system = queue
        .enqueue(
            user_id,
            "eligibility_result",
            &vars(&[("score", "20"), ("max_score", "70"), ("percentage", "28.57")]),
            Some(1),
        )
        .await
        .unwrap();

    let report = queue.drain(10).await.unwrap();
    assert_eq!(report.claimed, 3);
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 1);

    assert_eq!(email.count(), 1);
    assert_eq!(email.sent.lock().unwrap()[0].0, "route@example.com");

    let mail = NotificationQueueRepo::find_by_id(&pool, mail.id).await.unwrap().unwrap();
    assert_eq!(mail.status().unwrap(), QueueStatus::Sent);
    assert!(mail.sent_at.is_some());

    let sms = NotificationQueueRepo::find_by_id(&pool, sms.id).await.unwrap().unwrap();
    assert_eq!(sms.status().unwrap(), QueueStatus::Failed);
    assert_eq!(sms.attempts, 1);
    assert!(sms.last_error.unwrap().contains("gateway unavailable"));

    let system = NotificationQueueRepo::find_by_id(&pool, system.id).await.unwrap().unwrap();
    assert_eq!(system.status().unwrap(), QueueStatus::Sent);
    let inbox = NotificationRepo::list_for_user(&pool, user_id, true, 10, 0).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message, "Your eligibility score is 20/70 (28.57%).");

    assert_eq!(queue.drain(10).await.unwrap().claimed, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_transport_fails_the_item(pool: PgPool) {
    let user_id = new_user(&pool, "nomail@example.com", None).await;
    let queue = NotificationQueue::new(pool.clone());
    let item = queue
        .enqueue(user_id, "application_submitted", &vars(&[("application_id", "5")]), None)
        .await
        .unwrap();

    let report = queue.drain(10).await.unwrap();
    assert_eq!(report.failed, 1);
    let item = NotificationQueueRepo::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(item.status().unwrap(), QueueStatus::Failed);
    assert!(item.last_error.unwrap().contains("No transport configured"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_positive_limit_claims_nothing(pool: PgPool) {
    let user_id = new_user(&pool, "idle@example.com", None).await;
    let queue = NotificationQueue::new(pool.clone());
    let item = queue
        .enqueue(user_id, "application_submitted", &vars(&[("application_id", "9")]), None)
        .await
        .unwrap();

    for limit in [0, -5] {
        let report = queue.drain(limit).await.unwrap();
        assert_eq!(report.claimed, 0);
        assert_eq!(report.processed(), 0);
    }
    let item = NotificationQueueRepo::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(item.status().unwrap(), QueueStatus::Pending);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_drains_deliver_each_item_once(pool: PgPool) {
    let user_id = new_user(&pool, "race@example.com", None).await;
    let email = Arc::new(RecordingTransport::default());
    let queue = Arc::new(NotificationQueue::new(pool.clone()).with_email(email.clone()));
    for n in 0..12 {
        let id = n.to_string();
        queue
            .enqueue(user_id, "application_submitted", &vars(&[("application_id", id.as_str())]), None)
            .await
            .unwrap();
    }

    let (a, b) = tokio::join!(queue.drain(8), queue.drain(8));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.claimed + b.claimed, 12);
    assert_eq!(email.count(), 12);
    assert_eq!(
        NotificationQueueRepo::count_by_status(&pool, QueueStatus::Sent).await.unwrap(),
        12
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scheduler_works_off_backlog_in_batches(pool: PgPool) {
    let user_id = new_user(&pool, "batch@example.com", None).await;
    let queue = Arc::new(NotificationQueue::new(pool.clone()));
    for _ in 0..5 {
        queue
            .enqueue(user_id, "eligibility_result", &TemplateVars::new(), None)
            .await
            .unwrap();
    }

    let scheduler = DrainScheduler::new(queue, std::time::Duration::from_secs(60), 2);
    let processed = scheduler.drain_backlog(&CancellationToken::new()).await;
    assert_eq!(processed, 5);

    let inbox = Inbox::new(pool.clone());
    assert_eq!(inbox.unread_count(user_id).await.unwrap(), 5);
    let page = inbox.list(user_id, false, Some(2), None).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(inbox.mark_read(user_id, page[0].id).await.unwrap());
    assert_eq!(inbox.mark_all_read(user_id).await.unwrap(), 4);
}

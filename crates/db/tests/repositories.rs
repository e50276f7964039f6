//! Integration tests for the repository layer.
//!
//! - Draft edits only while the application is a draft
//! - Check result upsert keeps one row per (application, criterion)
//! - Queue claim ordering, disjoint claims and outcome bookkeeping
//! - Inbox read tracking

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use jobportal_core::eligibility::{CheckOutcome, CriterionDefinition};
use jobportal_core::status::{ApplicationStatus, CheckResult, NotificationChannel, QueueStatus};
use jobportal_db::models::application::{CreateApplication, UpdateApplicationDraft};
use jobportal_db::models::interview::CreateInterview;
use jobportal_db::models::notification_queue::NewQueueItem;
use jobportal_db::models::user::CreateUser;
use jobportal_db::repositories::{
    ApplicationRepo, CheckResultRepo, CriteriaRepo, InterviewRepo, NotificationQueueRepo,
    NotificationRepo, TemplateRepo, UserRepo,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: "Test Applicant".to_string(),
            phone: Some("+15550100".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_application(pool: &PgPool, user_id: i64) -> i64 {
    ApplicationRepo::create(
        pool,
        user_id,
        &CreateApplication {
            education_level: Some("bachelor".to_string()),
            years_of_experience: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

fn queue_item(recipient_id: i64, subject: &str, scheduled_in: Duration) -> NewQueueItem {
    NewQueueItem {
        recipient_id,
        channel: NotificationChannel::System,
        recipient_address: recipient_id.to_string(),
        subject: subject.to_string(),
        body: "body".to_string(),
        reference_type: Some("application".to_string()),
        reference_id: None,
        scheduled_at: Some(Utc::now() + scheduled_in),
    }
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn new_application_is_a_pending_draft(pool: PgPool) {
    let user_id = new_user(&pool, "draft@example.com").await;
    let id = new_application(&pool, user_id).await;

    let app = ApplicationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(app.status().unwrap(), ApplicationStatus::Draft);
    assert_eq!(app.eligibility_status, "pending");
    assert!(app.submitted_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn draft_update_is_refused_after_submission(pool: PgPool) {
    let user_id = new_user(&pool, "edit@example.com").await;
    let id = new_application(&pool, user_id).await;

    let edit = UpdateApplicationDraft {
        years_of_experience: Some(6),
        ..Default::default()
    };
    let updated = ApplicationRepo::update_draft(&pool, id, &edit).await.unwrap().unwrap();
    assert_eq!(updated.years_of_experience, Some(6));
    assert_eq!(updated.education_level.as_deref(), Some("bachelor"));

    let mut tx = pool.begin().await.unwrap();
    ApplicationRepo::set_status(&mut tx, id, ApplicationStatus::Submitted)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let refused = ApplicationRepo::update_draft(&pool, id, &edit).await.unwrap();
    assert!(refused.is_none());

    let app = ApplicationRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(app.submitted_at.is_some());
}

// ---------------------------------------------------------------------------
// Check results
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn check_result_upsert_replaces_previous_row(pool: PgPool) {
    let user_id = new_user(&pool, "checks@example.com").await;
    let app_id = new_application(&pool, user_id).await;
    let criterion = CriteriaRepo::create(
        &pool,
        &CriterionDefinition {
            name: "Experience".to_string(),
            criteria_type: "years_experience".to_string(),
            operator: "greater_equal".to_string(),
            required_value: json!(3),
            weight: 20.0,
            is_mandatory: false,
            department_id: None,
        },
    )
    .await
    .unwrap();

    let fail = CheckOutcome {
        result: CheckResult::Fail,
        actual_value: "2".to_string(),
        score: 0.0,
        notes: "Expected 3, actual 2".to_string(),
    };
    CheckResultRepo::upsert(&pool, app_id, criterion.id, &fail).await.unwrap();

    let pass = CheckOutcome {
        result: CheckResult::Pass,
        actual_value: "5".to_string(),
        score: 20.0,
        notes: "Requirement met: 3".to_string(),
    };
    CheckResultRepo::upsert(&pool, app_id, criterion.id, &pass).await.unwrap();

    let rows = CheckResultRepo::list_for_application(&pool, app_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].result, "pass");
    assert_eq!(rows[0].score, 20.0);
    assert_eq!(rows[0].actual_value.as_deref(), Some("5"));
}

#[sqlx::test(migrations = "./migrations")]
async fn deactivated_criteria_are_not_listed(pool: PgPool) {
    let definition = CriterionDefinition {
        name: "Degree".to_string(),
        criteria_type: "education_level".to_string(),
        operator: "greater_equal".to_string(),
        required_value: json!("bachelor"),
        weight: 30.0,
        is_mandatory: true,
        department_id: None,
    };
    let kept = CriteriaRepo::create(&pool, &definition).await.unwrap();
    let dropped = CriteriaRepo::create(&pool, &definition).await.unwrap();
    assert!(CriteriaRepo::set_active(&pool, dropped.id, false).await.unwrap());

    let active = CriteriaRepo::list_active(&pool).await.unwrap();
    let ids: Vec<i64> = active.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![kept.id]);
}

// ---------------------------------------------------------------------------
// Notification queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn claim_returns_due_items_oldest_first(pool: PgPool) {
    let user_id = new_user(&pool, "queue@example.com").await;
    let later = NotificationQueueRepo::insert(&pool, &queue_item(user_id, "later", Duration::minutes(-1)))
        .await
        .unwrap();
    let earlier =
        NotificationQueueRepo::insert(&pool, &queue_item(user_id, "earlier", Duration::minutes(-5)))
            .await
            .unwrap();
    let future =
        NotificationQueueRepo::insert(&pool, &queue_item(user_id, "future", Duration::hours(1)))
            .await
            .unwrap();

    let claimed = NotificationQueueRepo::claim_due(&pool, 10).await.unwrap();
    let ids: Vec<i64> = claimed.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
    assert!(claimed
        .iter()
        .all(|i| i.status().unwrap() == QueueStatus::Processing && i.claimed_at.is_some()));

    let untouched = NotificationQueueRepo::find_by_id(&pool, future.id).await.unwrap().unwrap();
    assert_eq!(untouched.status().unwrap(), QueueStatus::Pending);
}

#[sqlx::test(migrations = "./migrations")]
async fn claimed_items_are_not_claimed_again(pool: PgPool) {
    let user_id = new_user(&pool, "twice@example.com").await;
    for n in 0..3 {
        NotificationQueueRepo::insert(
            &pool,
            &queue_item(user_id, &format!("item {n}"), Duration::minutes(-1)),
        )
        .await
        .unwrap();
    }

    let first = NotificationQueueRepo::claim_due(&pool, 2).await.unwrap();
    let second = NotificationQueueRepo::claim_due(&pool, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(second.iter().all(|s| first.iter().all(|f| f.id != s.id)));
    assert!(NotificationQueueRepo::claim_due(&pool, 2).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn outcomes_are_recorded(pool: PgPool) {
    let user_id = new_user(&pool, "outcome@example.com").await;
    let ok = NotificationQueueRepo::insert(&pool, &queue_item(user_id, "ok", Duration::zero()))
        .await
        .unwrap();
    let bad = NotificationQueueRepo::insert(&pool, &queue_item(user_id, "bad", Duration::zero()))
        .await
        .unwrap();

    NotificationQueueRepo::mark_sent(&pool, ok.id).await.unwrap();
    NotificationQueueRepo::mark_failed(&pool, bad.id, "smtp timeout").await.unwrap();

    let ok = NotificationQueueRepo::find_by_id(&pool, ok.id).await.unwrap().unwrap();
    assert_eq!(ok.status().unwrap(), QueueStatus::Sent);
    assert!(ok.sent_at.is_some());
    assert_eq!(ok.attempts, 1);

    let bad = NotificationQueueRepo::find_by_id(&pool, bad.id).await.unwrap().unwrap();
    assert_eq!(bad.status().unwrap(), QueueStatus::Failed);
    assert_eq!(bad.last_error.as_deref(), Some("smtp timeout"));
    assert!(bad.sent_at.is_none());

    assert_eq!(
        NotificationQueueRepo::count_by_status(&pool, QueueStatus::Pending).await.unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Templates, inbox and interviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn seeded_templates_are_active(pool: PgPool) {
    let template = TemplateRepo::find_active_by_code(&pool, "application_submitted")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(template.channel().unwrap(), NotificationChannel::Email);

    assert!(TemplateRepo::set_active(&pool, "application_submitted", false).await.unwrap());
    assert!(TemplateRepo::find_active_by_code(&pool, "application_submitted")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn inbox_tracks_read_state(pool: PgPool) {
    let user_id = new_user(&pool, "inbox@example.com").await;
    let first = NotificationRepo::create(&pool, user_id, "One", "first", None, None)
        .await
        .unwrap();
    NotificationRepo::create(&pool, user_id, "Two", "second", Some("application"), Some(1))
        .await
        .unwrap();
    assert_eq!(NotificationRepo::unread_count(&pool, user_id).await.unwrap(), 2);

    assert!(NotificationRepo::mark_read(&pool, first, user_id).await.unwrap());
    assert!(!NotificationRepo::mark_read(&pool, first, user_id).await.unwrap());

    let unread = NotificationRepo::list_for_user(&pool, user_id, true, 10, 0).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].title, "Two");

    assert_eq!(NotificationRepo::mark_all_read(&pool, user_id).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, user_id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_interview_code_is_rejected(pool: PgPool) {
    let user_id = new_user(&pool, "interview@example.com").await;
    let app_id = new_application(&pool, user_id).await;
    let input = CreateInterview {
        application_id: app_id,
        interview_code: "INT-ABCD1234".to_string(),
        scheduled_at: Utc::now() + Duration::days(3),
        location: Some("Room 4".to_string()),
        created_by: None,
    };

    InterviewRepo::create(&pool, &input).await.unwrap();
    assert!(InterviewRepo::code_exists(&pool, "INT-ABCD1234").await.unwrap());
    assert!(!InterviewRepo::code_exists(&pool, "INT-ZZZZ0000").await.unwrap());

    let err = InterviewRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.is_unique_violation());
}

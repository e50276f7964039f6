use std::sync::Arc;

use jobportal_events::{
    DrainScheduler, EmailConfig, EmailDelivery, NotificationQueue, SmsConfig, SmsDelivery,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env()?;

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jobportal_worker=debug,jobportal_events=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Database ---
    let pool = jobportal_db::create_pool(&config.database_url, config.max_connections).await?;
    jobportal_db::health_check(&pool).await?;
    jobportal_db::run_migrations(&pool).await?;
    tracing::info!(max_connections = config.max_connections, "Database ready");

    // --- Transports ---
    let mut queue = NotificationQueue::new(pool.clone());
    match EmailConfig::from_env() {
        Some(email) => {
            tracing::info!(host = %email.smtp_host, port = email.smtp_port, "Email delivery enabled");
            queue = queue.with_email(Arc::new(EmailDelivery::new(email)));
        }
        None => tracing::warn!("SMTP_HOST not set, email notifications will fail"),
    }
    match SmsConfig::from_env() {
        Some(sms) => {
            tracing::info!(gateway = %sms.gateway_url, "SMS delivery enabled");
            queue = queue.with_sms(Arc::new(SmsDelivery::new(sms)?));
        }
        None => tracing::warn!("SMS_GATEWAY_URL not set, SMS notifications will fail"),
    }

    // --- Drain loop ---
    let cancel = CancellationToken::new();
    let scheduler = DrainScheduler::new(
        Arc::new(queue),
        config.drain_interval,
        config.drain_batch_size,
    );
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { scheduler.run(cancel).await }
    });
    tracing::info!(
        interval_secs = config.drain_interval.as_secs(),
        batch_size = config.drain_batch_size,
        "Notification worker started"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    cancel.cancel();
    handle.await?;

    pool.close().await;
    tracing::info!("Notification worker stopped");
    Ok(())
}

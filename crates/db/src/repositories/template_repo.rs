//! Repository for the `message_templates` table.

use jobportal_core::status::NotificationChannel;
use sqlx::PgPool;

use crate::models::template::MessageTemplate;

const COLUMNS: &str = "id, code, channel, subject, body, is_active, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    /// Look up an active template by its code.
    pub async fn find_active_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<MessageTemplate>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM message_templates WHERE code = $1 AND is_active = true");
        sqlx::query_as::<_, MessageTemplate>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Insert a template, or replace the one with the same code.
    pub async fn upsert(
        pool: &PgPool,
        code: &str,
        channel: NotificationChannel,
        subject: &str,
        body: &str,
    ) -> Result<MessageTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO message_templates (code, channel, subject, body) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_message_templates_code DO UPDATE SET \
                channel = EXCLUDED.channel, subject = EXCLUDED.subject, \
                body = EXCLUDED.body, is_active = true, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MessageTemplate>(&query)
            .bind(code)
            .bind(channel.as_str())
            .bind(subject)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Returns `true` if a template with that code exists.
    pub async fn set_active(pool: &PgPool, code: &str, is_active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE message_templates SET is_active = $2, updated_at = NOW() WHERE code = $1",
        )
        .bind(code)
        .bind(is_active)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

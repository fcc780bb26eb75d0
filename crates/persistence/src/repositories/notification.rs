//! Notification repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

/// Repository for stored in-app notifications.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification addressed to a customer email.
    pub async fn create(
        &self,
        recipient_email: &str,
        notification_type: &str,
        payload: serde_json::Value,
        link: Option<&str>,
        quote_id: Option<Uuid>,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (recipient_email, notification_type, payload, link, quote_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, recipient_email, notification_type, payload, link,
                      quote_id, read_at, created_at
            "#,
        )
        .bind(recipient_email)
        .bind(notification_type)
        .bind(payload)
        .bind(link)
        .bind(quote_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

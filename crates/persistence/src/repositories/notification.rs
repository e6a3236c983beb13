//! Notification repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Notification;
use domain::storage::{NotificationStore, StorageError};

use crate::entities::NotificationEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, StorageError> {
        let timer = QueryTimer::new("create_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (id, officer_id, notification_type, title, message,
                                       read, read_at, alert_id, case_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(notification.id)
        .bind(notification.officer_id)
        .bind(notification.notification_type.to_string())
        .bind(notification.title)
        .bind(notification.message)
        .bind(notification.read)
        .bind(notification.read_at)
        .bind(notification.alert_id)
        .bind(notification.case_id)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Notification::from).map_err(map_sqlx_err)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, StorageError> {
        let timer = QueryTimer::new("find_notification_by_id");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT * FROM notifications WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(Notification::from))
    }

    async fn list_for_officer(
        &self,
        officer_id: Uuid,
    ) -> Result<Vec<Notification>, StorageError> {
        let timer = QueryTimer::new("list_notifications_for_officer");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT * FROM notifications
            WHERE officer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(officer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result
            .map_err(map_sqlx_err)?
            .into_iter()
            .map(Notification::from)
            .collect())
    }

    async fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Notification>, StorageError> {
        let timer = QueryTimer::new("mark_notification_read");
        // COALESCE keeps the first read timestamp on repeat calls.
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            UPDATE notifications
            SET read = true, read_at = COALESCE(read_at, $2)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(read_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(Notification::from))
    }
}

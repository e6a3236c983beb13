//! SOS alert repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{AlertStatus, SosAlert};
use domain::storage::{AlertStore, StorageError};

use crate::entities::AlertEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for SOS alert database operations.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Creates a new AlertRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn create(&self, alert: SosAlert) -> Result<SosAlert, StorageError> {
        let timer = QueryTimer::new("create_alert");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            INSERT INTO sos_alerts (id, originator_id, originator_role, organization_id,
                                    kind, geofence_id, latitude, longitude, status,
                                    priority, assigned_officer_id, deleted, expires_at,
                                    affected_count, notification_sent, notification_sent_at,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(alert.id)
        .bind(alert.originator_id)
        .bind(alert.originator_role.as_str())
        .bind(alert.organization_id)
        .bind(alert.kind.as_str())
        .bind(alert.geofence_id)
        .bind(alert.latitude)
        .bind(alert.longitude)
        .bind(alert.status.as_str())
        .bind(alert.priority.as_str())
        .bind(alert.assigned_officer_id)
        .bind(alert.deleted)
        .bind(alert.expires_at)
        .bind(alert.affected_count)
        .bind(alert.notification_sent)
        .bind(alert.notification_sent_at)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(SosAlert::from).map_err(map_sqlx_err)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SosAlert>, StorageError> {
        let timer = QueryTimer::new("find_alert_by_id");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            SELECT * FROM sos_alerts WHERE id = $1 AND deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(SosAlert::from))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AlertStatus,
    ) -> Result<Option<SosAlert>, StorageError> {
        let timer = QueryTimer::new("set_alert_status");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            UPDATE sos_alerts
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(SosAlert::from))
    }

    async fn mark_notification_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<SosAlert>, StorageError> {
        let timer = QueryTimer::new("mark_alert_notification_sent");
        let result = sqlx::query_as::<_, AlertEntity>(
            r#"
            UPDATE sos_alerts
            SET notification_sent = true, notification_sent_at = $2, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sent_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(SosAlert::from))
    }
}

//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Notification, NotificationType};

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub officer_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub alert_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            officer_id: entity.officer_id,
            notification_type: NotificationType::parse(&entity.notification_type)
                .unwrap_or(NotificationType::AlertCreated),
            title: entity.title,
            message: entity.message,
            read: entity.read,
            read_at: entity.read_at,
            alert_id: entity.alert_id,
            case_id: entity.case_id,
            created_at: entity.created_at,
        }
    }
}

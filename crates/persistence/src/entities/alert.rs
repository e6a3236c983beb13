//! SOS alert entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{AlertKind, AlertPriority, AlertStatus, OriginatorRole, SosAlert};

/// Database row mapping for the sos_alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct AlertEntity {
    pub id: Uuid,
    pub originator_id: Uuid,
    pub originator_role: String,
    pub organization_id: Option<Uuid>,
    pub kind: String,
    pub geofence_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub priority: String,
    pub assigned_officer_id: Option<Uuid>,
    pub deleted: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub affected_count: Option<i64>,
    pub notification_sent: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AlertEntity> for SosAlert {
    fn from(entity: AlertEntity) -> Self {
        Self {
            id: entity.id,
            originator_id: entity.originator_id,
            originator_role: OriginatorRole::parse(&entity.originator_role)
                .unwrap_or(OriginatorRole::User),
            organization_id: entity.organization_id,
            kind: AlertKind::parse(&entity.kind).unwrap_or(AlertKind::Point),
            geofence_id: entity.geofence_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            status: AlertStatus::parse(&entity.status).unwrap_or(AlertStatus::Pending),
            priority: AlertPriority::parse(&entity.priority).unwrap_or_default(),
            assigned_officer_id: entity.assigned_officer_id,
            deleted: entity.deleted,
            expires_at: entity.expires_at,
            affected_count: entity.affected_count,
            notification_sent: entity.notification_sent,
            notification_sent_at: entity.notification_sent_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

//! Officer-to-geofence assignment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::OfficerGeofenceAssignment;

/// Database row mapping for the officer_geofence_assignments table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: Uuid,
    pub officer_id: Uuid,
    pub geofence_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AssignmentEntity> for OfficerGeofenceAssignment {
    fn from(entity: AssignmentEntity) -> Self {
        Self {
            id: entity.id,
            officer_id: entity.officer_id,
            geofence_id: entity.geofence_id,
            active: entity.active,
            created_at: entity.created_at,
        }
    }
}

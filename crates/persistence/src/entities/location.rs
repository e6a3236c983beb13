//! Location sample entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::LocationSample;

/// Database row mapping for the location_samples table.
#[derive(Debug, Clone, FromRow)]
pub struct LocationSampleEntity {
    pub id: i64,
    pub subject_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<LocationSampleEntity> for LocationSample {
    fn from(entity: LocationSampleEntity) -> Self {
        Self {
            id: entity.id,
            subject_id: entity.subject_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            captured_at: entity.captured_at,
            created_at: entity.created_at,
        }
    }
}

//! Incident entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Incident, IncidentStatus};

/// Database row mapping for the incidents table.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentEntity {
    pub id: Uuid,
    pub officer_id: Option<Uuid>,
    pub alert_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<IncidentEntity> for Incident {
    fn from(entity: IncidentEntity) -> Self {
        Self {
            id: entity.id,
            officer_id: entity.officer_id,
            alert_id: entity.alert_id,
            case_id: entity.case_id,
            status: IncidentStatus::parse(&entity.status).unwrap_or(IncidentStatus::Manual),
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}

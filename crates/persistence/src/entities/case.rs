//! Case entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Case, CaseStatus};

/// Database row mapping for the cases table.
#[derive(Debug, Clone, FromRow)]
pub struct CaseEntity {
    pub id: Uuid,
    pub alert_id: Uuid,
    pub assigned_officer_id: Option<Uuid>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CaseEntity> for Case {
    fn from(entity: CaseEntity) -> Self {
        Self {
            id: entity.id,
            alert_id: entity.alert_id,
            assigned_officer_id: entity.assigned_officer_id,
            status: CaseStatus::parse(&entity.status).unwrap_or(CaseStatus::Open),
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain_conversion() {
        let now = Utc::now();
        let entity = CaseEntity {
            id: Uuid::new_v4(),
            alert_id: Uuid::new_v4(),
            assigned_officer_id: Some(Uuid::new_v4()),
            status: "accepted".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let case: Case = entity.into();
        assert_eq!(case.status, CaseStatus::Accepted);
    }
}

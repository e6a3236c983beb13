//! Officer entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Officer;

/// Database row mapping for the officers table.
#[derive(Debug, Clone, FromRow)]
pub struct OfficerEntity {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Option<Uuid>,
    pub active: bool,
    pub push_token: Option<String>,
}

impl From<OfficerEntity> for Officer {
    fn from(entity: OfficerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            organization_id: entity.organization_id,
            active: entity.active,
            push_token: entity.push_token,
        }
    }
}

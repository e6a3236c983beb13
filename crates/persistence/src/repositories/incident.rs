//! Incident repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::Incident;
use domain::storage::{IncidentStore, StorageError};

use crate::entities::IncidentEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for incident database operations.
#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    /// Creates a new IncidentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentStore for IncidentRepository {
    async fn create(&self, incident: Incident) -> Result<Incident, StorageError> {
        let timer = QueryTimer::new("create_incident");
        let result = sqlx::query_as::<_, IncidentEntity>(
            r#"
            INSERT INTO incidents (id, officer_id, alert_id, case_id, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(incident.id)
        .bind(incident.officer_id)
        .bind(incident.alert_id)
        .bind(incident.case_id)
        .bind(incident.status.as_str())
        .bind(incident.notes)
        .bind(incident.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Incident::from).map_err(map_sqlx_err)
    }
}

//! Officer-to-geofence assignment repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::storage::{AssignmentStore, StorageError};

use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for officer assignment lookups.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    async fn active_geofence_ids(&self, officer_id: Uuid) -> Result<Vec<Uuid>, StorageError> {
        let timer = QueryTimer::new("active_assignment_geofence_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT geofence_id FROM officer_geofence_assignments
            WHERE officer_id = $1 AND active = true
            ORDER BY created_at
            "#,
        )
        .bind(officer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result.map_err(map_sqlx_err)
    }
}

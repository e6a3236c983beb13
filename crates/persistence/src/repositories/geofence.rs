//! Geofence repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Geofence;
use domain::storage::{GeofenceStore, StorageError};

use crate::entities::GeofenceEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for geofence-related database operations.
#[derive(Clone)]
pub struct GeofenceRepository {
    pool: PgPool,
}

impl GeofenceRepository {
    /// Creates a new GeofenceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GeofenceStore for GeofenceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Geofence>, StorageError> {
        let timer = QueryTimer::new("find_geofence_by_id");
        let result = sqlx::query_as::<_, GeofenceEntity>(
            r#"
            SELECT * FROM geofences WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(Geofence::from))
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Geofence>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let timer = QueryTimer::new("find_active_geofences_by_ids");
        // array_position preserves the caller's ordering.
        let result = sqlx::query_as::<_, GeofenceEntity>(
            r#"
            SELECT * FROM geofences
            WHERE id = ANY($1) AND active = true
            ORDER BY array_position($1, id)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result
            .map_err(map_sqlx_err)?
            .into_iter()
            .map(Geofence::from)
            .collect())
    }
}

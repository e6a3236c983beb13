//! Location sample repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::location::RecordLocationRequest;
use domain::models::LocationSample;
use domain::storage::{LocationStore, StorageError};

use crate::entities::LocationSampleEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for location-sample database operations.
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Creates a new LocationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStore for LocationRepository {
    async fn record(
        &self,
        request: &RecordLocationRequest,
    ) -> Result<LocationSample, StorageError> {
        let timer = QueryTimer::new("record_location_sample");
        let result = sqlx::query_as::<_, LocationSampleEntity>(
            r#"
            INSERT INTO location_samples (subject_id, latitude, longitude, captured_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.subject_id)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(request.captured_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(LocationSample::from).map_err(map_sqlx_err)
    }

    async fn latest_samples(&self) -> Result<Vec<LocationSample>, StorageError> {
        let timer = QueryTimer::new("latest_location_samples");
        let result = sqlx::query_as::<_, LocationSampleEntity>(
            r#"
            SELECT DISTINCT ON (subject_id) *
            FROM location_samples
            ORDER BY subject_id, captured_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result
            .map_err(map_sqlx_err)?
            .into_iter()
            .map(LocationSample::from)
            .collect())
    }
}

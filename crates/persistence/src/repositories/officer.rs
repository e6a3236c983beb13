//! Officer repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Officer;
use domain::storage::{OfficerStore, StorageError};

use crate::entities::OfficerEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for officer directory lookups.
#[derive(Clone)]
pub struct OfficerRepository {
    pool: PgPool,
}

impl OfficerRepository {
    /// Creates a new OfficerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfficerStore for OfficerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Officer>, StorageError> {
        let timer = QueryTimer::new("find_officer_by_id");
        let result = sqlx::query_as::<_, OfficerEntity>(
            r#"
            SELECT * FROM officers WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(Officer::from))
    }

    async fn active_in_organization(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<Officer>, StorageError> {
        let timer = QueryTimer::new("active_officers_in_organization");
        let result = match organization_id {
            Some(organization_id) => {
                sqlx::query_as::<_, OfficerEntity>(
                    r#"
                    SELECT * FROM officers
                    WHERE organization_id = $1 AND active = true
                    ORDER BY name
                    "#,
                )
                .bind(organization_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, OfficerEntity>(
                    r#"
                    SELECT * FROM officers WHERE active = true ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        Ok(result
            .map_err(map_sqlx_err)?
            .into_iter()
            .map(Officer::from)
            .collect())
    }
}

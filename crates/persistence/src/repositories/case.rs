//! Case repository for database operations.
//!
//! The cascading writes (case status together with the parent alert
//! status, case deletion together with the alert status reset) run in
//! a single transaction so a partial cascade is never observable.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{AlertStatus, Case, CaseStatus};
use domain::storage::{CaseStore, StorageError};

use crate::entities::CaseEntity;
use crate::map_sqlx_err;
use crate::metrics::QueryTimer;

/// Repository for case database operations.
#[derive(Clone)]
pub struct CaseRepository {
    pool: PgPool,
}

impl CaseRepository {
    /// Creates a new CaseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseStore for CaseRepository {
    async fn create(&self, case: Case) -> Result<Case, StorageError> {
        let timer = QueryTimer::new("create_case");
        let result = sqlx::query_as::<_, CaseEntity>(
            r#"
            INSERT INTO cases (id, alert_id, assigned_officer_id, status, notes,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(case.id)
        .bind(case.alert_id)
        .bind(case.assigned_officer_id)
        .bind(case.status.as_str())
        .bind(case.notes)
        .bind(case.created_at)
        .bind(case.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(Case::from).map_err(map_sqlx_err)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Case>, StorageError> {
        let timer = QueryTimer::new("find_case_by_id");
        let result = sqlx::query_as::<_, CaseEntity>(
            r#"
            SELECT * FROM cases WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result.map_err(map_sqlx_err)?.map(Case::from))
    }

    async fn list_by_alert(&self, alert_id: Uuid) -> Result<Vec<Case>, StorageError> {
        let timer = QueryTimer::new("list_cases_by_alert");
        let result = sqlx::query_as::<_, CaseEntity>(
            r#"
            SELECT * FROM cases WHERE alert_id = $1 ORDER BY created_at DESC
            "#,
        )
        .bind(alert_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result
            .map_err(map_sqlx_err)?
            .into_iter()
            .map(Case::from)
            .collect())
    }

    async fn update_status_cascading(
        &self,
        case_id: Uuid,
        status: CaseStatus,
        alert_status: Option<AlertStatus>,
    ) -> Result<Option<Case>, StorageError> {
        let timer = QueryTimer::new("update_case_status_cascading");
        let result = async {
            let mut tx = self.pool.begin().await?;

            let case = sqlx::query_as::<_, CaseEntity>(
                r#"
                UPDATE cases
                SET status = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(case_id)
            .bind(status.as_str())
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(ref case) = case {
                if let Some(alert_status) = alert_status {
                    sqlx::query(
                        r#"
                        UPDATE sos_alerts
                        SET status = $2, updated_at = NOW()
                        WHERE id = $1 AND deleted = false
                        "#,
                    )
                    .bind(case.alert_id)
                    .bind(alert_status.as_str())
                    .execute(&mut *tx)
                    .await?;
                }
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(case)
        }
        .await;
        timer.record();
        let case = result.map_err(|e| {
            tracing::error!(
                case_id = %case_id,
                case_status = status.as_str(),
                error = %e,
                "Case status cascade failed; transaction rolled back"
            );
            map_sqlx_err(e)
        })?;
        Ok(case.map(Case::from))
    }

    async fn delete_resetting_alert(
        &self,
        case_id: Uuid,
        reset_to: AlertStatus,
    ) -> Result<Option<Case>, StorageError> {
        let timer = QueryTimer::new("delete_case_resetting_alert");
        let result = async {
            let mut tx = self.pool.begin().await?;

            let case = sqlx::query_as::<_, CaseEntity>(
                r#"
                DELETE FROM cases WHERE id = $1 RETURNING *
                "#,
            )
            .bind(case_id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(ref case) = case {
                sqlx::query(
                    r#"
                    UPDATE sos_alerts
                    SET status = $2, updated_at = NOW()
                    WHERE id = $1 AND deleted = false AND status <> $2
                    "#,
                )
                .bind(case.alert_id)
                .bind(reset_to.as_str())
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(case)
        }
        .await;
        timer.record();
        let case = result.map_err(|e| {
            tracing::error!(
                case_id = %case_id,
                reset_to = reset_to.as_str(),
                error = %e,
                "Case deletion with alert reset failed; transaction rolled back"
            );
            map_sqlx_err(e)
        })?;
        Ok(case.map(Case::from))
    }
}

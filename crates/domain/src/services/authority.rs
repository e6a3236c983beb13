//! Backend-authoritative alert creation.
//!
//! The only path by which an area broadcast differs from a point
//! alert. Officer identity comes from the authenticated session's
//! capability flags, zone membership comes from stored assignments,
//! and the affected-subject count is computed server-side and
//! snapshotted. Nothing zone-related is ever taken from the request
//! body.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{
    ActorCapabilities, AlertKind, AlertPriority, OriginatorRole, SosAlert,
};
use crate::services::dispatch::{DispatchFanout, FanoutReport};
use crate::services::freshness::{LocationFreshnessIndex, SubjectMatch};
use crate::storage::{AlertStore, AssignmentStore, GeofenceStore};

/// Request to declare an area broadcast alert.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AreaAlertRequest {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    /// Optional broadcast expiry; must lie strictly in the future.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request to create a point alert, scoped to its creator.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PointAlertRequest {
    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    #[serde(default)]
    pub priority: AlertPriority,

    pub geofence_id: Option<Uuid>,
}

/// What declaring an area alert produced.
#[derive(Debug, Clone)]
pub struct AreaAlertOutcome {
    pub alert: SosAlert,
    /// Subjects inside the assigned zones at declaration time.
    pub affected: Vec<SubjectMatch>,
    pub fanout: FanoutReport,
}

/// Validates and persists alerts, enforcing broadcast authority.
#[derive(Clone)]
pub struct GeofenceAuthorityGuard {
    alerts: Arc<dyn AlertStore>,
    assignments: Arc<dyn AssignmentStore>,
    geofences: Arc<dyn GeofenceStore>,
    freshness: LocationFreshnessIndex,
    dispatch: DispatchFanout,
    config: EngineConfig,
}

impl GeofenceAuthorityGuard {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        assignments: Arc<dyn AssignmentStore>,
        geofences: Arc<dyn GeofenceStore>,
        freshness: LocationFreshnessIndex,
        dispatch: DispatchFanout,
        config: EngineConfig,
    ) -> Self {
        Self {
            alerts,
            assignments,
            geofences,
            freshness,
            dispatch,
            config,
        }
    }

    /// Declares an area broadcast on behalf of an officer.
    ///
    /// Priority is forced to `High` regardless of anything the client
    /// sent, and the affected count stored on the alert is a snapshot
    /// of this moment, never recomputed later.
    pub async fn declare_area_alert(
        &self,
        actor: &ActorCapabilities,
        request: AreaAlertRequest,
    ) -> Result<AreaAlertOutcome, EngineError> {
        if !actor.is_officer {
            return Err(EngineError::PermissionDenied(
                "only officers may declare area alerts".to_string(),
            ));
        }
        request.validate()?;
        if let Some(expires_at) = &request.expires_at {
            shared::validation::validate_expiry(expires_at).map_err(|e| {
                let message = e
                    .message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                EngineError::Validation(message)
            })?;
        }

        let zone_ids = self.assignments.active_geofence_ids(actor.actor_id).await?;
        let zones = self.geofences.find_active_by_ids(&zone_ids).await?;
        if zones.is_empty() {
            return Err(EngineError::Validation(
                "no assigned geofences".to_string(),
            ));
        }

        let affected = self
            .freshness
            .find_subjects_in_geofences(&zones, self.config.freshness_window_hours)
            .await?;

        let now = Utc::now();
        let alert = SosAlert {
            id: Uuid::new_v4(),
            originator_id: actor.actor_id,
            originator_role: OriginatorRole::Officer,
            organization_id: actor.organization_id,
            kind: AlertKind::AreaBroadcast,
            geofence_id: None,
            latitude: request.latitude,
            longitude: request.longitude,
            status: self.config.status_schema.initial(),
            priority: AlertPriority::High,
            assigned_officer_id: None,
            deleted: false,
            expires_at: request.expires_at,
            affected_count: Some(affected.len() as i64),
            notification_sent: false,
            notification_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        let alert = self.alerts.create(alert).await?;

        tracing::info!(
            alert_id = %alert.id,
            officer_id = %actor.actor_id,
            zones = zones.len(),
            affected = affected.len(),
            "Area alert declared"
        );

        let fanout = self.dispatch.notify_alert_created(&alert).await?;
        let alert = self
            .alerts
            .mark_notification_sent(alert.id, Utc::now())
            .await?
            .unwrap_or(alert);

        Ok(AreaAlertOutcome {
            alert,
            affected,
            fanout,
        })
    }

    /// Creates a point alert for the actor's own position. No zone
    /// authority is involved; the alert is scoped to the creator.
    pub async fn declare_point_alert(
        &self,
        actor: &ActorCapabilities,
        request: PointAlertRequest,
    ) -> Result<(SosAlert, FanoutReport), EngineError> {
        request.validate()?;

        let now = Utc::now();
        let alert = SosAlert {
            id: Uuid::new_v4(),
            originator_id: actor.actor_id,
            originator_role: if actor.is_officer {
                OriginatorRole::Officer
            } else {
                OriginatorRole::User
            },
            organization_id: actor.organization_id,
            kind: AlertKind::Point,
            geofence_id: request.geofence_id,
            latitude: request.latitude,
            longitude: request.longitude,
            status: self.config.status_schema.initial(),
            priority: request.priority,
            assigned_officer_id: None,
            deleted: false,
            expires_at: None,
            affected_count: None,
            notification_sent: false,
            notification_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        let alert = self.alerts.create(alert).await?;

        tracing::info!(
            alert_id = %alert.id,
            originator = %actor.actor_id,
            priority = alert.priority.as_str(),
            "Point alert created"
        );

        let fanout = self.dispatch.notify_alert_created(&alert).await?;
        let alert = self
            .alerts
            .mark_notification_sent(alert.id, Utc::now())
            .await?
            .unwrap_or(alert);

        Ok((alert, fanout))
    }
}

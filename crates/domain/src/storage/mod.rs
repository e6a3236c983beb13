//! Storage trait contracts for the alert engine.
//!
//! The engine reads and writes geofences, location samples, alerts,
//! cases, incidents, notifications and officer assignments through
//! these traits. It assumes transactional semantics where a method doc
//! says so but is otherwise agnostic to the backing store: the
//! `persistence` crate implements them over Postgres, and
//! [`memory::InMemoryStore`] implements them for development and tests.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AlertStatus, Case, CaseStatus, Geofence, Incident, LocationSample, Notification, Officer,
    SosAlert,
};
use crate::models::location::RecordLocationRequest;

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Read access to geofences.
#[async_trait]
pub trait GeofenceStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Geofence>, StorageError>;

    /// Returns the active geofences among `ids`, in the given order.
    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Geofence>, StorageError>;
}

/// Append-only location samples.
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn record(&self, request: &RecordLocationRequest)
        -> Result<LocationSample, StorageError>;

    /// The most recent sample per subject. Freshness filtering is the
    /// caller's concern; scoping (per organization) is the
    /// deployment's.
    async fn latest_samples(&self) -> Result<Vec<LocationSample>, StorageError>;
}

/// Alert persistence.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn create(&self, alert: SosAlert) -> Result<SosAlert, StorageError>;

    /// Soft-deleted alerts are not returned.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SosAlert>, StorageError>;

    async fn set_status(
        &self,
        id: Uuid,
        status: AlertStatus,
    ) -> Result<Option<SosAlert>, StorageError>;

    async fn mark_notification_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<SosAlert>, StorageError>;
}

/// Case persistence, including the writes that must stay atomic with
/// the parent alert.
#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn create(&self, case: Case) -> Result<Case, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Case>, StorageError>;

    async fn list_by_alert(&self, alert_id: Uuid) -> Result<Vec<Case>, StorageError>;

    /// Writes the case status and, when `alert_status` is `Some`, the
    /// parent alert status in the same transaction. A partial cascade
    /// must never be observable.
    async fn update_status_cascading(
        &self,
        case_id: Uuid,
        status: CaseStatus,
        alert_status: Option<AlertStatus>,
    ) -> Result<Option<Case>, StorageError>;

    /// Deletes the case and, in the same transaction, resets the
    /// parent alert to `reset_to` unless it already has that status.
    /// Returns the deleted case.
    async fn delete_resetting_alert(
        &self,
        case_id: Uuid,
        reset_to: AlertStatus,
    ) -> Result<Option<Case>, StorageError>;
}

/// Incident records.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn create(&self, incident: Incident) -> Result<Incident, StorageError>;
}

/// Notification rows.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, StorageError>;

    async fn list_for_officer(&self, officer_id: Uuid)
        -> Result<Vec<Notification>, StorageError>;

    /// Sets the read flag and timestamp only if the notification is
    /// still unread; the first read timestamp sticks. Returns the row
    /// either way, so calling twice is safe.
    async fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Notification>, StorageError>;
}

/// Officer-to-geofence assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Geofence ids of the officer's active assignments.
    async fn active_geofence_ids(&self, officer_id: Uuid) -> Result<Vec<Uuid>, StorageError>;
}

/// Officer directory as the dispatcher needs it.
#[async_trait]
pub trait OfficerStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Officer>, StorageError>;

    /// Active officers of the given organization, or all active
    /// officers when `organization_id` is `None`.
    async fn active_in_organization(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<Officer>, StorageError>;
}

//! In-memory store for development and testing.
//!
//! Implements every storage trait over a single `RwLock`-guarded state,
//! which also gives the "atomic" case/alert writes their required
//! all-or-nothing behavior.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::location::RecordLocationRequest;
use crate::models::{
    AlertStatus, Case, CaseStatus, Geofence, Incident, LocationSample, Notification, Officer,
    OfficerGeofenceAssignment, SosAlert,
};
use crate::storage::{
    AlertStore, AssignmentStore, CaseStore, GeofenceStore, IncidentStore, LocationStore,
    NotificationStore, OfficerStore, StorageError,
};

#[derive(Default)]
struct State {
    geofences: HashMap<Uuid, Geofence>,
    samples: Vec<LocationSample>,
    next_sample_id: i64,
    alerts: HashMap<Uuid, SosAlert>,
    cases: HashMap<Uuid, Case>,
    incidents: Vec<Incident>,
    notifications: HashMap<Uuid, Notification>,
    assignments: Vec<OfficerGeofenceAssignment>,
    officers: HashMap<Uuid, Officer>,
}

/// In-memory implementation of all engine store traits.
#[derive(Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_geofence(&self, geofence: Geofence) {
        self.state
            .write()
            .await
            .geofences
            .insert(geofence.id, geofence);
    }

    pub async fn add_officer(&self, officer: Officer) {
        self.state.write().await.officers.insert(officer.id, officer);
    }

    pub async fn assign_officer(&self, officer_id: Uuid, geofence_id: Uuid) {
        self.state
            .write()
            .await
            .assignments
            .push(OfficerGeofenceAssignment {
                id: Uuid::new_v4(),
                officer_id,
                geofence_id,
                active: true,
                created_at: Utc::now(),
            });
    }

    /// Test convenience: record a raw sample without request validation.
    pub async fn record_sample(
        &self,
        subject_id: Uuid,
        latitude: f64,
        longitude: f64,
        captured_at: DateTime<Utc>,
    ) {
        let mut state = self.state.write().await;
        state.next_sample_id += 1;
        let id = state.next_sample_id;
        state.samples.push(LocationSample {
            id,
            subject_id,
            latitude,
            longitude,
            captured_at,
            created_at: Utc::now(),
        });
    }

    pub async fn notification_count(&self) -> usize {
        self.state.read().await.notifications.len()
    }

    pub async fn incidents(&self) -> Vec<Incident> {
        self.state.read().await.incidents.clone()
    }
}

#[async_trait]
impl GeofenceStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Geofence>, StorageError> {
        Ok(self.state.read().await.geofences.get(&id).cloned())
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Geofence>, StorageError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.geofences.get(id))
            .filter(|f| f.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LocationStore for InMemoryStore {
    async fn record(
        &self,
        request: &RecordLocationRequest,
    ) -> Result<LocationSample, StorageError> {
        let mut state = self.state.write().await;
        state.next_sample_id += 1;
        let sample = LocationSample {
            id: state.next_sample_id,
            subject_id: request.subject_id,
            latitude: request.latitude,
            longitude: request.longitude,
            captured_at: request.captured_at,
            created_at: Utc::now(),
        };
        state.samples.push(sample.clone());
        Ok(sample)
    }

    async fn latest_samples(&self) -> Result<Vec<LocationSample>, StorageError> {
        let state = self.state.read().await;
        let mut latest: HashMap<Uuid, &LocationSample> = HashMap::new();
        for sample in &state.samples {
            match latest.get(&sample.subject_id) {
                Some(existing) if existing.captured_at >= sample.captured_at => {}
                _ => {
                    latest.insert(sample.subject_id, sample);
                }
            }
        }
        Ok(latest.into_values().cloned().collect())
    }
}

#[async_trait]
impl AlertStore for InMemoryStore {
    async fn create(&self, alert: SosAlert) -> Result<SosAlert, StorageError> {
        self.state
            .write()
            .await
            .alerts
            .insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SosAlert>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .alerts
            .get(&id)
            .filter(|a| !a.deleted)
            .cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AlertStatus,
    ) -> Result<Option<SosAlert>, StorageError> {
        let mut state = self.state.write().await;
        Ok(state.alerts.get_mut(&id).map(|alert| {
            alert.status = status;
            alert.updated_at = Utc::now();
            alert.clone()
        }))
    }

    async fn mark_notification_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<Option<SosAlert>, StorageError> {
        let mut state = self.state.write().await;
        Ok(state.alerts.get_mut(&id).map(|alert| {
            alert.notification_sent = true;
            alert.notification_sent_at = Some(sent_at);
            alert.updated_at = Utc::now();
            alert.clone()
        }))
    }
}

#[async_trait]
impl CaseStore for InMemoryStore {
    async fn create(&self, case: Case) -> Result<Case, StorageError> {
        self.state.write().await.cases.insert(case.id, case.clone());
        Ok(case)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Case>, StorageError> {
        Ok(self.state.read().await.cases.get(&id).cloned())
    }

    async fn list_by_alert(&self, alert_id: Uuid) -> Result<Vec<Case>, StorageError> {
        let state = self.state.read().await;
        let mut cases: Vec<Case> = state
            .cases
            .values()
            .filter(|c| c.alert_id == alert_id)
            .cloned()
            .collect();
        cases.sort_by_key(|c| c.created_at);
        Ok(cases)
    }

    async fn update_status_cascading(
        &self,
        case_id: Uuid,
        status: CaseStatus,
        alert_status: Option<AlertStatus>,
    ) -> Result<Option<Case>, StorageError> {
        let mut state = self.state.write().await;
        let Some(case) = state.cases.get_mut(&case_id) else {
            return Ok(None);
        };
        case.status = status;
        case.updated_at = Utc::now();
        let case = case.clone();

        if let Some(new_status) = alert_status {
            if let Some(alert) = state.alerts.get_mut(&case.alert_id) {
                alert.status = new_status;
                alert.updated_at = Utc::now();
            }
        }
        Ok(Some(case))
    }

    async fn delete_resetting_alert(
        &self,
        case_id: Uuid,
        reset_to: AlertStatus,
    ) -> Result<Option<Case>, StorageError> {
        let mut state = self.state.write().await;
        let Some(case) = state.cases.remove(&case_id) else {
            return Ok(None);
        };
        if let Some(alert) = state.alerts.get_mut(&case.alert_id) {
            if alert.status != reset_to {
                alert.status = reset_to;
                alert.updated_at = Utc::now();
            }
        }
        Ok(Some(case))
    }
}

#[async_trait]
impl IncidentStore for InMemoryStore {
    async fn create(&self, incident: Incident) -> Result<Incident, StorageError> {
        self.state.write().await.incidents.push(incident.clone());
        Ok(incident)
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn create(&self, notification: Notification) -> Result<Notification, StorageError> {
        self.state
            .write()
            .await
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, StorageError> {
        Ok(self.state.read().await.notifications.get(&id).cloned())
    }

    async fn list_for_officer(
        &self,
        officer_id: Uuid,
    ) -> Result<Vec<Notification>, StorageError> {
        let state = self.state.read().await;
        let mut notifications: Vec<Notification> = state
            .notifications
            .values()
            .filter(|n| n.officer_id == officer_id)
            .cloned()
            .collect();
        notifications.sort_by_key(|n| n.created_at);
        Ok(notifications)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<Option<Notification>, StorageError> {
        let mut state = self.state.write().await;
        Ok(state.notifications.get_mut(&id).map(|n| {
            if !n.read {
                n.read = true;
                n.read_at = Some(read_at);
            }
            n.clone()
        }))
    }
}

#[async_trait]
impl AssignmentStore for InMemoryStore {
    async fn active_geofence_ids(&self, officer_id: Uuid) -> Result<Vec<Uuid>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.officer_id == officer_id && a.active)
            .map(|a| a.geofence_id)
            .collect())
    }
}

#[async_trait]
impl OfficerStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Officer>, StorageError> {
        Ok(self.state.read().await.officers.get(&id).cloned())
    }

    async fn active_in_organization(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<Officer>, StorageError> {
        let state = self.state.read().await;
        let mut officers: Vec<Officer> = state
            .officers
            .values()
            .filter(|o| o.active)
            .filter(|o| match organization_id {
                Some(org) => o.organization_id == Some(org),
                None => true,
            })
            .cloned()
            .collect();
        officers.sort_by_key(|o| o.id);
        Ok(officers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_samples_keeps_newest_per_subject() {
        let store = InMemoryStore::new();
        let subject = Uuid::new_v4();
        let older = Utc::now() - chrono::Duration::hours(2);
        let newer = Utc::now() - chrono::Duration::hours(1);
        store.record_sample(subject, 1.0, 1.0, older).await;
        store.record_sample(subject, 2.0, 2.0, newer).await;

        let samples = store.latest_samples().await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].latitude, 2.0);
        assert_eq!(samples[0].captured_at, newer);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let store = InMemoryStore::new();
        let n = Notification::new(
            Uuid::new_v4(),
            crate::models::NotificationType::AlertCreated,
            "t",
            "m",
            None,
            None,
        );
        let n = NotificationStore::create(&store, n).await.unwrap();

        let first_read_at = Utc::now();
        let after_first = store.mark_read(n.id, first_read_at).await.unwrap().unwrap();
        assert!(after_first.read);
        assert_eq!(after_first.read_at, Some(first_read_at));

        let later = first_read_at + chrono::Duration::minutes(5);
        let after_second = store.mark_read(n.id, later).await.unwrap().unwrap();
        assert_eq!(after_second.read_at, Some(first_read_at));
    }

    #[tokio::test]
    async fn test_active_in_organization_filters() {
        let store = InMemoryStore::new();
        let org = Uuid::new_v4();
        store
            .add_officer(Officer {
                id: Uuid::new_v4(),
                name: "on duty".into(),
                organization_id: Some(org),
                active: true,
                push_token: None,
            })
            .await;
        store
            .add_officer(Officer {
                id: Uuid::new_v4(),
                name: "off duty".into(),
                organization_id: Some(org),
                active: false,
                push_token: None,
            })
            .await;
        store
            .add_officer(Officer {
                id: Uuid::new_v4(),
                name: "other org".into(),
                organization_id: Some(Uuid::new_v4()),
                active: true,
                push_token: None,
            })
            .await;

        assert_eq!(store.active_in_organization(Some(org)).await.unwrap().len(), 1);
        assert_eq!(store.active_in_organization(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_soft_deleted_alert_hidden() {
        use crate::models::{AlertKind, AlertPriority, AlertStatus, OriginatorRole};

        let store = InMemoryStore::new();
        let alert = SosAlert {
            id: Uuid::new_v4(),
            originator_id: Uuid::new_v4(),
            originator_role: OriginatorRole::User,
            organization_id: None,
            kind: AlertKind::Point,
            geofence_id: None,
            latitude: 0.0,
            longitude: 0.0,
            status: AlertStatus::Pending,
            priority: AlertPriority::Medium,
            assigned_officer_id: None,
            deleted: true,
            expires_at: None,
            affected_count: None,
            notification_sent: false,
            notification_sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = alert.id;
        AlertStore::create(&store, alert).await.unwrap();
        assert!(AlertStore::find_by_id(&store, id).await.unwrap().is_none());
    }
}

//! Alert / case lifecycle.
//!
//! The case-to-alert status projection is an explicit pure function
//! invoked synchronously by the case handlers, not a framework event
//! hook, so the state machine stays testable without a live event bus.
//! Writes that touch both a case and its parent alert go through the
//! store's cascading methods, which are transactional.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    ActorCapabilities, AlertStatus, AlertStatusSchema, Case, CaseStatus, Incident, IncidentStatus,
    SosAlert,
};
use crate::services::dispatch::{DispatchFanout, FanoutReport};
use crate::storage::{AlertStore, CaseStore, IncidentStore};

/// Maps a case status write onto the alert status it implies.
///
/// `Rejected` implies nothing: a rejected case leaves the alert where
/// it is. The match is exhaustive so a new case status cannot be added
/// without deciding its projection.
pub fn project_case_status(status: CaseStatus) -> Option<AlertStatus> {
    match status {
        CaseStatus::Open => Some(AlertStatus::Pending),
        CaseStatus::Accepted => Some(AlertStatus::Accepted),
        CaseStatus::Resolved => Some(AlertStatus::Resolved),
        CaseStatus::Rejected => None,
    }
}

/// Computes the alert status change a case status write should
/// cascade, under the given schema. Returns `None` when the alert
/// already has the projected status (no redundant write).
pub fn apply_case_status_change(
    alert_status: AlertStatus,
    case_status: CaseStatus,
    schema: AlertStatusSchema,
) -> Option<AlertStatus> {
    let projected = schema.normalize(project_case_status(case_status)?);
    (projected != alert_status).then_some(projected)
}

/// State machine driver for alerts, cases and incidents.
#[derive(Clone)]
pub struct AlertLifecycle {
    alerts: Arc<dyn AlertStore>,
    cases: Arc<dyn CaseStore>,
    incidents: Arc<dyn IncidentStore>,
    dispatch: DispatchFanout,
    schema: AlertStatusSchema,
}

impl AlertLifecycle {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        cases: Arc<dyn CaseStore>,
        incidents: Arc<dyn IncidentStore>,
        dispatch: DispatchFanout,
        schema: AlertStatusSchema,
    ) -> Self {
        Self {
            alerts,
            cases,
            incidents,
            dispatch,
            schema,
        }
    }

    /// Opens a case against an alert.
    ///
    /// Creation alone changes no alert status. When the case comes
    /// with an assignee, that officer gets a one-time "case assigned"
    /// notification.
    pub async fn open_case(
        &self,
        actor: &ActorCapabilities,
        alert_id: Uuid,
        assigned_officer_id: Option<Uuid>,
        notes: Option<String>,
    ) -> Result<(Case, FanoutReport), EngineError> {
        if !actor.is_officer && !actor.is_admin {
            return Err(EngineError::PermissionDenied(
                "only officers or administrators may open cases".to_string(),
            ));
        }
        let alert = self.require_alert(alert_id).await?;

        let now = Utc::now();
        let case = Case {
            id: Uuid::new_v4(),
            alert_id,
            assigned_officer_id,
            status: CaseStatus::Open,
            notes,
            created_at: now,
            updated_at: now,
        };
        let case = self.cases.create(case).await?;
        tracing::info!(
            case_id = %case.id,
            alert_id = %alert_id,
            assigned = ?assigned_officer_id,
            "Case opened"
        );

        let fanout = self.dispatch.notify_case_assigned(&case, &alert).await?;
        Ok((case, fanout))
    }

    /// Writes a case status and cascades the projected alert status in
    /// the same transaction.
    pub async fn update_case_status(
        &self,
        actor: &ActorCapabilities,
        case_id: Uuid,
        new_status: CaseStatus,
    ) -> Result<Case, EngineError> {
        let case = self.require_case(case_id).await?;
        self.ensure_can_mutate(actor, &case)?;
        let alert = self.require_alert(case.alert_id).await?;

        let cascade = apply_case_status_change(alert.status, new_status, self.schema);
        let updated = self
            .cases
            .update_status_cascading(case_id, new_status, cascade)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("case {case_id}")))?;

        tracing::info!(
            case_id = %case_id,
            case_status = new_status.as_str(),
            alert_id = %alert.id,
            alert_status = ?cascade.map(|s| s.as_str()),
            "Case status updated"
        );
        Ok(updated)
    }

    /// Explicit resolve action: resolves the case, force-resolves the
    /// parent alert and records an incident. Independent of the
    /// generic projection rule.
    pub async fn resolve_case(
        &self,
        actor: &ActorCapabilities,
        case_id: Uuid,
        notes: Option<String>,
    ) -> Result<(Case, Incident), EngineError> {
        let case = self.require_case(case_id).await?;
        self.ensure_can_mutate(actor, &case)?;
        let alert = self.require_alert(case.alert_id).await?;

        let cascade =
            (alert.status != AlertStatus::Resolved).then_some(AlertStatus::Resolved);
        let case = self
            .cases
            .update_status_cascading(case_id, CaseStatus::Resolved, cascade)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("case {case_id}")))?;

        let incident = self
            .incidents
            .create(Incident {
                id: Uuid::new_v4(),
                officer_id: case.assigned_officer_id,
                alert_id: Some(alert.id),
                case_id: Some(case.id),
                status: IncidentStatus::Resolved,
                notes,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            case_id = %case.id,
            alert_id = %alert.id,
            incident_id = %incident.id,
            "Case resolved"
        );
        Ok((case, incident))
    }

    /// Resolves an alert directly, without a case. Open to the alert's
    /// assigned officer and to administrators scoped to the alert's
    /// organization; records an incident the same way case resolution
    /// does, with no case link.
    pub async fn resolve_alert(
        &self,
        actor: &ActorCapabilities,
        alert_id: Uuid,
        notes: Option<String>,
    ) -> Result<(SosAlert, Incident), EngineError> {
        let alert = self.require_alert(alert_id).await?;
        let admin_in_scope =
            actor.is_admin && actor.organization_id == alert.organization_id;
        let assigned =
            actor.is_officer && alert.assigned_officer_id == Some(actor.actor_id);
        if !admin_in_scope && !assigned {
            return Err(EngineError::PermissionDenied(
                "not authorized to resolve this alert".to_string(),
            ));
        }

        let alert = self
            .alerts
            .set_status(alert_id, AlertStatus::Resolved)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("alert {alert_id}")))?;

        let incident = self
            .incidents
            .create(Incident {
                id: Uuid::new_v4(),
                officer_id: actor.is_officer.then_some(actor.actor_id),
                alert_id: Some(alert.id),
                case_id: None,
                status: IncidentStatus::Resolved,
                notes,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            alert_id = %alert.id,
            incident_id = %incident.id,
            "Alert resolved directly"
        );
        Ok((alert, incident))
    }

    /// Deletes a case. Losing the active handler resets triage: if the
    /// parent alert is not already at the schema's initial status, it
    /// is reset there in the same transaction.
    pub async fn delete_case(
        &self,
        actor: &ActorCapabilities,
        case_id: Uuid,
    ) -> Result<Case, EngineError> {
        let case = self.require_case(case_id).await?;
        self.ensure_can_mutate(actor, &case)?;

        let reset_to = self.schema.initial();
        let deleted = self
            .cases
            .delete_resetting_alert(case_id, reset_to)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("case {case_id}")))?;

        tracing::info!(
            case_id = %case_id,
            alert_id = %deleted.alert_id,
            reset_to = reset_to.as_str(),
            "Case deleted, alert triage reset"
        );
        Ok(deleted)
    }

    /// Lists an alert's cases. Open to the assigned officers and to
    /// administrators scoped to the alert's organization.
    pub async fn list_cases(
        &self,
        actor: &ActorCapabilities,
        alert_id: Uuid,
    ) -> Result<Vec<Case>, EngineError> {
        let alert = self.require_alert(alert_id).await?;
        let cases = self.cases.list_by_alert(alert_id).await?;

        let admin_in_scope =
            actor.is_admin && actor.organization_id == alert.organization_id;
        let assigned = actor.is_officer
            && cases
                .iter()
                .any(|c| c.assigned_officer_id == Some(actor.actor_id));
        if !admin_in_scope && !assigned {
            return Err(EngineError::PermissionDenied(
                "not assigned to this alert's cases".to_string(),
            ));
        }
        Ok(cases)
    }

    fn ensure_can_mutate(
        &self,
        actor: &ActorCapabilities,
        case: &Case,
    ) -> Result<(), EngineError> {
        if actor.is_officer && case.assigned_officer_id == Some(actor.actor_id) {
            return Ok(());
        }
        Err(EngineError::PermissionDenied(
            "case is not assigned to this officer".to_string(),
        ))
    }

    async fn require_alert(&self, alert_id: Uuid) -> Result<SosAlert, EngineError> {
        self.alerts
            .find_by_id(alert_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("alert {alert_id}")))
    }

    async fn require_case(&self, case_id: Uuid) -> Result<Case, EngineError> {
        self.cases
            .find_by_id(case_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("case {case_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::models::{AlertKind, AlertPriority, OriginatorRole};
    use crate::services::dispatch::MockPushChannel;
    use crate::storage::memory::InMemoryStore;

    fn lifecycle(store: Arc<InMemoryStore>, schema: AlertStatusSchema) -> AlertLifecycle {
        let dispatch = DispatchFanout::new(
            store.clone(),
            store.clone(),
            Arc::new(MockPushChannel::new()),
            Duration::from_millis(100),
        );
        AlertLifecycle::new(store.clone(), store.clone(), store, dispatch, schema)
    }

    async fn seed_alert(store: &InMemoryStore, status: AlertStatus) -> SosAlert {
        let now = Utc::now();
        let alert = SosAlert {
            id: Uuid::new_v4(),
            originator_id: Uuid::new_v4(),
            originator_role: OriginatorRole::User,
            organization_id: Some(Uuid::new_v4()),
            kind: AlertKind::Point,
            geofence_id: None,
            latitude: 0.0,
            longitude: 0.0,
            status,
            priority: AlertPriority::Medium,
            assigned_officer_id: None,
            deleted: false,
            expires_at: None,
            affected_count: None,
            notification_sent: false,
            notification_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        AlertStore::create(store, alert).await.unwrap()
    }

    #[test]
    fn test_projection_table() {
        assert_eq!(project_case_status(CaseStatus::Open), Some(AlertStatus::Pending));
        assert_eq!(
            project_case_status(CaseStatus::Accepted),
            Some(AlertStatus::Accepted)
        );
        assert_eq!(
            project_case_status(CaseStatus::Resolved),
            Some(AlertStatus::Resolved)
        );
        assert_eq!(project_case_status(CaseStatus::Rejected), None);
    }

    #[test]
    fn test_apply_skips_redundant_write() {
        let schema = AlertStatusSchema::ThreeState;
        assert_eq!(
            apply_case_status_change(AlertStatus::Pending, CaseStatus::Open, schema),
            None
        );
        assert_eq!(
            apply_case_status_change(AlertStatus::Pending, CaseStatus::Accepted, schema),
            Some(AlertStatus::Accepted)
        );
        assert_eq!(
            apply_case_status_change(AlertStatus::Accepted, CaseStatus::Rejected, schema),
            None
        );
    }

    #[test]
    fn test_apply_under_two_state_schema() {
        let schema = AlertStatusSchema::TwoState;
        // Accepted projects to Active, which the alert already is.
        assert_eq!(
            apply_case_status_change(AlertStatus::Active, CaseStatus::Accepted, schema),
            None
        );
        assert_eq!(
            apply_case_status_change(AlertStatus::Active, CaseStatus::Resolved, schema),
            Some(AlertStatus::Resolved)
        );
    }

    #[tokio::test]
    async fn test_resolved_case_resolves_pending_alert_and_delete_resets() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Pending).await;
        let officer_id = Uuid::new_v4();
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (case, _) = lc
            .open_case(&admin, alert.id, Some(officer_id), None)
            .await
            .unwrap();

        let officer = ActorCapabilities::officer(officer_id, alert.organization_id);
        lc.update_case_status(&officer, case.id, CaseStatus::Resolved)
            .await
            .unwrap();
        let resolved = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);

        lc.delete_case(&officer, case.id).await.unwrap();
        let reset = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(reset.status, AlertStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_leaves_pending_alert_alone() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Pending).await;
        let officer_id = Uuid::new_v4();
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (case, _) = lc
            .open_case(&admin, alert.id, Some(officer_id), None)
            .await
            .unwrap();

        let before = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        let officer = ActorCapabilities::officer(officer_id, alert.organization_id);
        lc.delete_case(&officer, case.id).await.unwrap();
        let after = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(after.status, AlertStatus::Pending);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_case_creation_does_not_change_alert_status() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Accepted).await;
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        lc.open_case(&admin, alert.id, Some(Uuid::new_v4()), None)
            .await
            .unwrap();

        let unchanged = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, AlertStatus::Accepted);
    }

    #[tokio::test]
    async fn test_case_assignment_notifies_assignee_once() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Pending).await;
        let officer_id = Uuid::new_v4();
        store
            .add_officer(crate::models::Officer {
                id: officer_id,
                name: "O".into(),
                organization_id: alert.organization_id,
                active: true,
                push_token: None,
            })
            .await;
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (_, fanout) = lc
            .open_case(&admin, alert.id, Some(officer_id), None)
            .await
            .unwrap();
        assert_eq!(fanout.notifications_created, 1);
        assert_eq!(store.notification_count().await, 1);
    }

    #[tokio::test]
    async fn test_unassigned_officer_cannot_mutate_case() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Pending).await;
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (case, _) = lc
            .open_case(&admin, alert.id, Some(Uuid::new_v4()), None)
            .await
            .unwrap();

        let stranger = ActorCapabilities::officer(Uuid::new_v4(), alert.organization_id);
        let result = lc
            .update_case_status(&stranger, case.id, CaseStatus::Accepted)
            .await;
        assert!(matches!(result, Err(EngineError::PermissionDenied(_))));

        let untouched = CaseStore::find_by_id(&*store, case.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, CaseStatus::Open);
    }

    #[tokio::test]
    async fn test_resolve_records_incident() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Accepted).await;
        let officer_id = Uuid::new_v4();
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (case, _) = lc
            .open_case(&admin, alert.id, Some(officer_id), None)
            .await
            .unwrap();

        let officer = ActorCapabilities::officer(officer_id, alert.organization_id);
        let (resolved_case, incident) = lc
            .resolve_case(&officer, case.id, Some("handled on site".into()))
            .await
            .unwrap();

        assert_eq!(resolved_case.status, CaseStatus::Resolved);
        assert_eq!(incident.status, IncidentStatus::Resolved);
        assert_eq!(incident.alert_id, Some(alert.id));
        assert_eq!(incident.case_id, Some(case.id));
        assert_eq!(incident.officer_id, Some(officer_id));

        let resolved_alert = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(resolved_alert.status, AlertStatus::Resolved);
        assert_eq!(store.incidents().await.len(), 1);
    }

    #[tokio::test]
    async fn test_assigned_officer_resolves_alert_directly() {
        let store = Arc::new(InMemoryStore::new());
        let mut alert = seed_alert(&store, AlertStatus::Pending).await;
        let officer_id = Uuid::new_v4();
        alert.assigned_officer_id = Some(officer_id);
        AlertStore::create(&*store, alert.clone()).await.unwrap();
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let officer = ActorCapabilities::officer(officer_id, alert.organization_id);
        let (resolved, incident) = lc
            .resolve_alert(&officer, alert.id, Some("false alarm".into()))
            .await
            .unwrap();

        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert_eq!(incident.status, IncidentStatus::Resolved);
        assert_eq!(incident.alert_id, Some(alert.id));
        assert_eq!(incident.case_id, None);
        assert_eq!(incident.officer_id, Some(officer_id));

        let persisted = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, AlertStatus::Resolved);
    }

    #[tokio::test]
    async fn test_direct_resolve_permissions() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Pending).await;
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        // Unassigned officer may not resolve.
        let stranger = ActorCapabilities::officer(Uuid::new_v4(), alert.organization_id);
        assert!(matches!(
            lc.resolve_alert(&stranger, alert.id, None).await,
            Err(EngineError::PermissionDenied(_))
        ));

        // Admin of another organization may not either.
        let foreign_admin = ActorCapabilities::admin(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert!(matches!(
            lc.resolve_alert(&foreign_admin, alert.id, None).await,
            Err(EngineError::PermissionDenied(_))
        ));

        // In-scope admin resolves without a case.
        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (resolved, incident) = lc.resolve_alert(&admin, alert.id, None).await.unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert_eq!(incident.officer_id, None);
    }

    #[tokio::test]
    async fn test_new_case_may_open_against_resolved_alert() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Resolved).await;
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        let (case, _) = lc
            .open_case(&admin, alert.id, None, None)
            .await
            .unwrap();
        assert_eq!(case.status, CaseStatus::Open);

        // Opening the case did not move the alert out of resolved.
        let unchanged = AlertStore::find_by_id(&*store, alert.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, AlertStatus::Resolved);
    }

    #[tokio::test]
    async fn test_list_cases_permissions() {
        let store = Arc::new(InMemoryStore::new());
        let alert = seed_alert(&store, AlertStatus::Pending).await;
        let officer_id = Uuid::new_v4();
        let lc = lifecycle(store.clone(), AlertStatusSchema::ThreeState);

        let admin = ActorCapabilities::admin(Uuid::new_v4(), alert.organization_id);
        lc.open_case(&admin, alert.id, Some(officer_id), None)
            .await
            .unwrap();

        // Assigned officer sees the cases.
        let officer = ActorCapabilities::officer(officer_id, alert.organization_id);
        assert_eq!(lc.list_cases(&officer, alert.id).await.unwrap().len(), 1);

        // In-scope admin sees them too.
        assert_eq!(lc.list_cases(&admin, alert.id).await.unwrap().len(), 1);

        // Admin of another organization does not.
        let foreign_admin = ActorCapabilities::admin(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert!(matches!(
            lc.list_cases(&foreign_admin, alert.id).await,
            Err(EngineError::PermissionDenied(_))
        ));
    }
}

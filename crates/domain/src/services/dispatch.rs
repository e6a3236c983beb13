//! Notification fan-out.
//!
//! One durable `Notification` row per recipient, then a best-effort
//! push through the injected [`PushChannel`]. Delivery is
//! at-most-one-attempt: a failed or timed-out push is logged and
//! counted, never retried, and never rolls back the notification row
//! or the alert.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{Case, Notification, NotificationType, Officer, SosAlert};
use crate::storage::{NotificationStore, OfficerStore, StorageError};

/// External push transport.
///
/// Implementations must not error for normal failure modes (network
/// problems, dead tokens); they return `false` instead.
#[async_trait::async_trait]
pub trait PushChannel: Send + Sync {
    async fn send_to_officer(
        &self,
        officer: &Officer,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> bool;
}

/// Mock push channel for development and testing.
///
/// Logs sends but doesn't actually deliver anything.
#[derive(Debug, Clone, Default)]
pub struct MockPushChannel {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockPushChannel {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl PushChannel for MockPushChannel {
    async fn send_to_officer(
        &self,
        officer: &Officer,
        title: &str,
        _body: &str,
        _data: serde_json::Value,
    ) -> bool {
        if self.simulate_failure {
            tracing::warn!(
                officer_id = %officer.id,
                title = %title,
                "Mock push channel simulating failure"
            );
            return false;
        }
        tracing::info!(
            officer_id = %officer.id,
            title = %title,
            "Mock: Would push notification to officer"
        );
        true
    }
}

/// Outcome of a fan-out pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub notifications_created: usize,
    pub pushes_sent: usize,
    pub pushes_failed: usize,
}

/// Creates notification rows and pushes them to officers.
#[derive(Clone)]
pub struct DispatchFanout {
    notifications: Arc<dyn NotificationStore>,
    officers: Arc<dyn OfficerStore>,
    push: Arc<dyn PushChannel>,
    push_timeout: Duration,
}

impl DispatchFanout {
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        officers: Arc<dyn OfficerStore>,
        push: Arc<dyn PushChannel>,
        push_timeout: Duration,
    ) -> Self {
        Self {
            notifications,
            officers,
            push,
            push_timeout,
        }
    }

    /// Recipient set for a freshly created alert: active officers of
    /// the originator's organization, or all active officers when the
    /// originator has none.
    pub async fn recipients_for_alert(
        &self,
        alert: &SosAlert,
    ) -> Result<Vec<Officer>, StorageError> {
        self.officers
            .active_in_organization(alert.organization_id)
            .await
    }

    /// Fans one event out to `recipients`.
    ///
    /// Each recipient gets exactly one `Notification` row (its own
    /// small write, so one failing recipient cannot poison the rest),
    /// followed by a push attempt bounded by the configured timeout.
    pub async fn notify_officers(
        &self,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        alert_id: Option<Uuid>,
        case_id: Option<Uuid>,
        recipients: &[Officer],
    ) -> FanoutReport {
        let mut report = FanoutReport::default();
        let data = serde_json::json!({
            "type": notification_type.to_string(),
            "alertId": alert_id,
            "caseId": case_id,
        });

        for officer in recipients {
            let notification = Notification::new(
                officer.id,
                notification_type,
                title,
                message,
                alert_id,
                case_id,
            );
            match self.notifications.create(notification).await {
                Ok(_) => report.notifications_created += 1,
                Err(e) => {
                    tracing::error!(
                        officer_id = %officer.id,
                        error = %e,
                        "Failed to persist notification row; skipping push for recipient"
                    );
                    continue;
                }
            }

            let delivered = tokio::time::timeout(
                self.push_timeout,
                self.push
                    .send_to_officer(officer, title, message, data.clone()),
            )
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(
                    officer_id = %officer.id,
                    timeout_ms = self.push_timeout.as_millis() as u64,
                    "Push attempt timed out"
                );
                false
            });

            if delivered {
                report.pushes_sent += 1;
            } else {
                report.pushes_failed += 1;
                tracing::warn!(
                    officer_id = %officer.id,
                    notification_type = %notification_type,
                    "Push delivery failed; notification row stands"
                );
            }
        }

        tracing::info!(
            notification_type = %notification_type,
            recipients = recipients.len(),
            created = report.notifications_created,
            sent = report.pushes_sent,
            failed = report.pushes_failed,
            "Fan-out complete"
        );
        report
    }

    /// Fan-out for a new alert (point or area broadcast).
    pub async fn notify_alert_created(&self, alert: &SosAlert) -> Result<FanoutReport, StorageError> {
        let recipients = self.recipients_for_alert(alert).await?;
        let notification_type = match alert.kind {
            crate::models::AlertKind::Point => NotificationType::AlertCreated,
            crate::models::AlertKind::AreaBroadcast => NotificationType::AreaBroadcast,
        };
        let (title, message) = alert_content(alert);
        Ok(self
            .notify_officers(
                notification_type,
                &title,
                &message,
                Some(alert.id),
                None,
                &recipients,
            )
            .await)
    }

    /// One-time fan-out to the single officer a case was assigned to.
    /// No-op when the case has no assignee.
    pub async fn notify_case_assigned(
        &self,
        case: &Case,
        alert: &SosAlert,
    ) -> Result<FanoutReport, StorageError> {
        let Some(officer_id) = case.assigned_officer_id else {
            return Ok(FanoutReport::default());
        };
        let Some(officer) = self.officers.find_by_id(officer_id).await? else {
            tracing::warn!(
                case_id = %case.id,
                officer_id = %officer_id,
                "Case assigned to unknown officer; skipping notification"
            );
            return Ok(FanoutReport::default());
        };

        let title = "Case assigned".to_string();
        let message = format!(
            "You have been assigned a case for the {} priority alert at ({:.5}, {:.5})",
            alert.priority.as_str(),
            alert.latitude,
            alert.longitude
        );
        Ok(self
            .notify_officers(
                NotificationType::CaseAssigned,
                &title,
                &message,
                Some(alert.id),
                Some(case.id),
                std::slice::from_ref(&officer),
            )
            .await)
    }

    /// Idempotent mark-as-read: only the first call sets the read
    /// timestamp; repeating it is safe.
    pub async fn mark_read(&self, notification_id: Uuid) -> Result<Notification, EngineError> {
        self.notifications
            .mark_read(notification_id, Utc::now())
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("notification {notification_id}")))
    }
}

/// Title and message for an alert notification.
fn alert_content(alert: &SosAlert) -> (String, String) {
    match alert.kind {
        crate::models::AlertKind::Point => (
            "New SOS alert".to_string(),
            format!(
                "{} triggered an SOS at ({:.5}, {:.5})",
                match alert.originator_role {
                    crate::models::OriginatorRole::User => "A user",
                    crate::models::OriginatorRole::Officer => "An officer",
                },
                alert.latitude,
                alert.longitude
            ),
        ),
        crate::models::AlertKind::AreaBroadcast => (
            "Area alert broadcast".to_string(),
            format!(
                "An area alert was declared at ({:.5}, {:.5}); {} person(s) in the affected zones",
                alert.latitude,
                alert.longitude,
                alert.affected_count.unwrap_or(0)
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, AlertPriority, AlertStatus, OriginatorRole};
    use crate::storage::memory::InMemoryStore;

    fn alert(kind: AlertKind, organization_id: Option<Uuid>) -> SosAlert {
        SosAlert {
            id: Uuid::new_v4(),
            originator_id: Uuid::new_v4(),
            originator_role: OriginatorRole::User,
            organization_id,
            kind,
            geofence_id: None,
            latitude: 48.1486,
            longitude: 17.1077,
            status: AlertStatus::Pending,
            priority: AlertPriority::High,
            assigned_officer_id: None,
            deleted: false,
            expires_at: None,
            affected_count: Some(3),
            notification_sent: false,
            notification_sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn officer(organization_id: Option<Uuid>) -> Officer {
        Officer {
            id: Uuid::new_v4(),
            name: "Officer".into(),
            organization_id,
            active: true,
            push_token: Some("token".into()),
        }
    }

    fn fanout(store: Arc<InMemoryStore>, push: Arc<dyn PushChannel>) -> DispatchFanout {
        DispatchFanout::new(store.clone(), store, push, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_notify_creates_one_row_per_recipient() {
        let store = Arc::new(InMemoryStore::new());
        let recipients = vec![officer(None), officer(None), officer(None)];
        for o in &recipients {
            store.add_officer(o.clone()).await;
        }
        let dispatch = fanout(store.clone(), Arc::new(MockPushChannel::new()));

        let report = dispatch
            .notify_officers(
                NotificationType::AlertCreated,
                "New SOS alert",
                "details",
                Some(Uuid::new_v4()),
                None,
                &recipients,
            )
            .await;

        assert_eq!(report.notifications_created, 3);
        assert_eq!(report.pushes_sent, 3);
        assert_eq!(report.pushes_failed, 0);
        assert_eq!(store.notification_count().await, 3);
    }

    #[tokio::test]
    async fn test_push_failure_keeps_notification_rows() {
        let store = Arc::new(InMemoryStore::new());
        let recipients = vec![officer(None), officer(None)];
        let dispatch = fanout(store.clone(), Arc::new(MockPushChannel::failing()));

        let report = dispatch
            .notify_officers(
                NotificationType::AreaBroadcast,
                "Area alert broadcast",
                "details",
                None,
                None,
                &recipients,
            )
            .await;

        assert_eq!(report.notifications_created, 2);
        assert_eq!(report.pushes_sent, 0);
        assert_eq!(report.pushes_failed, 2);
        // The durable record of intent survives delivery failure.
        assert_eq!(store.notification_count().await, 2);
    }

    struct StuckPushChannel;

    #[async_trait::async_trait]
    impl PushChannel for StuckPushChannel {
        async fn send_to_officer(
            &self,
            _officer: &Officer,
            _title: &str,
            _body: &str,
            _data: serde_json::Value,
        ) -> bool {
            tokio::time::sleep(Duration::from_secs(60)).await;
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_push_bounded_by_timeout() {
        let store = Arc::new(InMemoryStore::new());
        let dispatch = fanout(store.clone(), Arc::new(StuckPushChannel));

        let report = dispatch
            .notify_officers(
                NotificationType::AlertCreated,
                "t",
                "m",
                None,
                None,
                &[officer(None)],
            )
            .await;

        assert_eq!(report.pushes_failed, 1);
        assert_eq!(report.notifications_created, 1);
    }

    #[tokio::test]
    async fn test_recipients_scoped_to_organization() {
        let store = Arc::new(InMemoryStore::new());
        let org = Uuid::new_v4();
        store.add_officer(officer(Some(org))).await;
        store.add_officer(officer(Some(Uuid::new_v4()))).await;
        let dispatch = fanout(store.clone(), Arc::new(MockPushChannel::new()));

        let recipients = dispatch
            .recipients_for_alert(&alert(AlertKind::Point, Some(org)))
            .await
            .unwrap();
        assert_eq!(recipients.len(), 1);

        // Originator without an organization reaches every active officer.
        let recipients = dispatch
            .recipients_for_alert(&alert(AlertKind::Point, None))
            .await
            .unwrap();
        assert_eq!(recipients.len(), 2);
    }

    #[tokio::test]
    async fn test_case_assigned_notifies_exactly_the_assignee() {
        let store = Arc::new(InMemoryStore::new());
        let assignee = officer(None);
        store.add_officer(assignee.clone()).await;
        store.add_officer(officer(None)).await;
        let dispatch = fanout(store.clone(), Arc::new(MockPushChannel::new()));

        let a = alert(AlertKind::Point, None);
        let case = Case {
            id: Uuid::new_v4(),
            alert_id: a.id,
            assigned_officer_id: Some(assignee.id),
            status: crate::models::CaseStatus::Open,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let report = dispatch.notify_case_assigned(&case, &a).await.unwrap();
        assert_eq!(report.notifications_created, 1);

        let rows = store.list_for_officer(assignee.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notification_type, NotificationType::CaseAssigned);
        assert_eq!(rows[0].case_id, Some(case.id));
    }

    #[tokio::test]
    async fn test_mark_read_twice_keeps_first_timestamp() {
        let store = Arc::new(InMemoryStore::new());
        let dispatch = fanout(store.clone(), Arc::new(MockPushChannel::new()));
        let n = NotificationStore::create(
            &*store,
            Notification::new(
                Uuid::new_v4(),
                NotificationType::AlertCreated,
                "t",
                "m",
                None,
                None,
            ),
        )
        .await
        .unwrap();

        let first = dispatch.mark_read(n.id).await.unwrap();
        let second = dispatch.mark_read(n.id).await.unwrap();
        assert!(first.read);
        assert_eq!(first.read_at, second.read_at);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_id() {
        let store = Arc::new(InMemoryStore::new());
        let dispatch = fanout(store, Arc::new(MockPushChannel::new()));
        let result = dispatch.mark_read(Uuid::new_v4()).await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }
}

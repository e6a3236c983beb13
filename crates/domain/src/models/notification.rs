//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AlertCreated,
    AreaBroadcast,
    CaseAssigned,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::AlertCreated => write!(f, "alert_created"),
            NotificationType::AreaBroadcast => write!(f, "area_broadcast"),
            NotificationType::CaseAssigned => write!(f, "case_assigned"),
        }
    }
}

impl NotificationType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "alert_created" => Some(NotificationType::AlertCreated),
            "area_broadcast" => Some(NotificationType::AreaBroadcast),
            "case_assigned" => Some(NotificationType::CaseAssigned),
            _ => None,
        }
    }
}

/// Durable record of "this officer was told about this event".
///
/// Created once per (event, recipient) regardless of whether the push
/// delivery succeeded. Mark-as-read is idempotent: the first read
/// timestamp sticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub officer_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub alert_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Builds an unread notification for an officer.
    pub fn new(
        officer_id: Uuid,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        alert_id: Option<Uuid>,
        case_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            officer_id,
            notification_type,
            title: title.into(),
            message: message.into(),
            read: false,
            read_at: None,
            alert_id,
            case_id,
            created_at: now,
        }
    }
}

//! SOS alert domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of the person who triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginatorRole {
    User,
    Officer,
}

impl OriginatorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginatorRole::User => "user",
            OriginatorRole::Officer => "officer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(OriginatorRole::User),
            "officer" => Some(OriginatorRole::Officer),
            _ => None,
        }
    }
}

/// Alert targeting kind.
///
/// Point alerts are scoped to their creator; area broadcasts compute
/// their recipients from geofence membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Point,
    AreaBroadcast,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Point => "point",
            AlertKind::AreaBroadcast => "area_broadcast",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "point" => Some(AlertKind::Point),
            "area_broadcast" => Some(AlertKind::AreaBroadcast),
            _ => None,
        }
    }
}

/// Alert status.
///
/// Two schemas exist in the field: the three-state
/// `pending → accepted → resolved` flow and a legacy two-state
/// `active → resolved` flow. Which one a deployment uses is selected
/// through [`AlertStatusSchema`]; `Active` never appears under the
/// three-state schema and `Pending`/`Accepted` never appear under the
/// two-state schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Accepted,
    Active,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Accepted => "accepted",
            AlertStatus::Active => "active",
            AlertStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AlertStatus::Pending),
            "accepted" => Some(AlertStatus::Accepted),
            "active" => Some(AlertStatus::Active),
            "resolved" => Some(AlertStatus::Resolved),
            _ => None,
        }
    }

    /// Terminal state: no automatic transitions leave `Resolved`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved)
    }
}

/// Which alert status schema a deployment runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatusSchema {
    #[default]
    ThreeState,
    TwoState,
}

impl AlertStatusSchema {
    /// Status given to a freshly created alert.
    pub fn initial(&self) -> AlertStatus {
        match self {
            AlertStatusSchema::ThreeState => AlertStatus::Pending,
            AlertStatusSchema::TwoState => AlertStatus::Active,
        }
    }

    /// Collapses a three-state status onto this schema. Under the
    /// two-state schema both `Pending` and `Accepted` map to `Active`.
    pub fn normalize(&self, status: AlertStatus) -> AlertStatus {
        match self {
            AlertStatusSchema::ThreeState => match status {
                AlertStatus::Active => AlertStatus::Pending,
                other => other,
            },
            AlertStatusSchema::TwoState => match status {
                AlertStatus::Pending | AlertStatus::Accepted => AlertStatus::Active,
                other => other,
            },
        }
    }
}

/// Alert priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Low => "low",
            AlertPriority::Medium => "medium",
            AlertPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(AlertPriority::Low),
            "medium" => Some(AlertPriority::Medium),
            "high" => Some(AlertPriority::High),
            _ => None,
        }
    }
}

/// An SOS alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    pub id: Uuid,
    pub originator_id: Uuid,
    pub originator_role: OriginatorRole,
    /// Organization the originator belonged to at creation time.
    pub organization_id: Option<Uuid>,
    pub kind: AlertKind,
    pub geofence_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: AlertStatus,
    pub priority: AlertPriority,
    pub assigned_officer_id: Option<Uuid>,
    pub deleted: bool,
    /// Area broadcasts only: when the broadcast stops being relevant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Area broadcasts only: snapshot of how many subjects sat inside
    /// the assigned zones at creation time. Never recomputed.
    pub affected_count: Option<i64>,
    pub notification_sent: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

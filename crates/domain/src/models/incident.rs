//! Incident domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an incident record came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Resolved,
    Manual,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Manual => "manual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resolved" => Some(IncidentStatus::Resolved),
            "manual" => Some(IncidentStatus::Manual),
            _ => None,
        }
    }
}

/// Terminal record of a handled (or manually filed) event.
///
/// Incidents have an independent lifecycle: nothing cascades into them
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub officer_id: Option<Uuid>,
    pub alert_id: Option<Uuid>,
    pub case_id: Option<Uuid>,
    pub status: IncidentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

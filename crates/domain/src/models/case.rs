//! Case domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Case status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Open,
    Accepted,
    Rejected,
    Resolved,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "open",
            CaseStatus::Accepted => "accepted",
            CaseStatus::Rejected => "rejected",
            CaseStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(CaseStatus::Open),
            "accepted" => Some(CaseStatus::Accepted),
            "rejected" => Some(CaseStatus::Rejected),
            "resolved" => Some(CaseStatus::Resolved),
            _ => None,
        }
    }
}

/// A triage case attached to an alert.
///
/// One alert may accumulate several cases over time; only the most
/// recent case write drives the parent alert's status (see the
/// lifecycle service). Cases cascade-delete with their alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Uuid,
    pub alert_id: Uuid,
    pub assigned_officer_id: Option<Uuid>,
    pub status: CaseStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_status_round_trip() {
        for status in [
            CaseStatus::Open,
            CaseStatus::Accepted,
            CaseStatus::Rejected,
            CaseStatus::Resolved,
        ] {
            assert_eq!(CaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CaseStatus::parse("closed"), None);
    }

    #[test]
    fn test_case_serialization() {
        let case = Case {
            id: Uuid::new_v4(),
            alert_id: Uuid::new_v4(),
            assigned_officer_id: None,
            status: CaseStatus::Open,
            notes: Some("caller reported shouting".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&case).unwrap();
        assert!(json.contains("\"status\":\"open\""));
        assert!(json.contains("\"alertId\""));
    }
}

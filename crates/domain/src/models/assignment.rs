//! Officer-to-geofence assignment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Officer membership in a patrol zone.
///
/// The authoritative source for "which zones may this officer declare
/// area alerts in". Client-supplied zone lists are never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerGeofenceAssignment {
    pub id: Uuid,
    pub officer_id: Uuid,
    pub geofence_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

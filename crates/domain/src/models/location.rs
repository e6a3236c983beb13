//! Location sample domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single reported position for a user or officer.
///
/// Samples are append-only; only the most recent sample per subject is
/// consulted for geofence matching. Retention is an external concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub id: i64,
    pub subject_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Payload for a location-update call.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordLocationRequest {
    pub subject_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    pub captured_at: DateTime<Utc>,
}

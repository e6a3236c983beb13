//! Geofence domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named geographic region scoped to an organization, used to bound
/// officer patrol areas and alert targeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub shape: GeofenceShape,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Geofence geometry.
///
/// Polygon rings are stored as `(lon, lat)` pairs (GIS convention).
/// The ring may be closed (first point repeated) or open; containment
/// tests handle both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum GeofenceShape {
    #[serde(rename_all = "camelCase")]
    Circle {
        center_lat: f64,
        center_lon: f64,
        radius_meters: f64,
    },
    Polygon { ring: Vec<(f64, f64)> },
}

impl GeofenceShape {
    /// Database string for the shape kind column.
    pub fn kind_str(&self) -> &'static str {
        match self {
            GeofenceShape::Circle { .. } => "circle",
            GeofenceShape::Polygon { .. } => "polygon",
        }
    }
}

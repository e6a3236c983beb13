//! Geofence entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Geofence, GeofenceShape};

/// Database row mapping for the geofences table.
///
/// Circle columns are null for polygons and vice versa; the ring is a
/// JSONB array of `[lon, lat]` pairs.
#[derive(Debug, Clone, FromRow)]
pub struct GeofenceEntity {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub shape_kind: String,
    pub center_lat: Option<f64>,
    pub center_lon: Option<f64>,
    pub radius_meters: Option<f64>,
    pub ring: Option<serde_json::Value>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GeofenceEntity> for Geofence {
    fn from(entity: GeofenceEntity) -> Self {
        // A misconfigured row degrades to a shape that contains
        // nothing (zero radius / empty ring) rather than failing the
        // whole read; the geometry kernel treats both as empty.
        let shape = match entity.shape_kind.as_str() {
            "polygon" => GeofenceShape::Polygon {
                ring: entity
                    .ring
                    .and_then(|v| serde_json::from_value::<Vec<(f64, f64)>>(v).ok())
                    .unwrap_or_default(),
            },
            _ => GeofenceShape::Circle {
                center_lat: entity.center_lat.unwrap_or(0.0),
                center_lon: entity.center_lon.unwrap_or(0.0),
                radius_meters: entity.radius_meters.unwrap_or(0.0),
            },
        };
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            name: entity.name,
            shape,
            active: entity.active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_entity() -> GeofenceEntity {
        GeofenceEntity {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "HQ".to_string(),
            shape_kind: "circle".to_string(),
            center_lat: Some(37.7749),
            center_lon: Some(-122.4194),
            radius_meters: Some(500.0),
            ring: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_circle_entity_to_domain() {
        let geofence: Geofence = circle_entity().into();
        match geofence.shape {
            GeofenceShape::Circle {
                center_lat,
                radius_meters,
                ..
            } => {
                assert_eq!(center_lat, 37.7749);
                assert_eq!(radius_meters, 500.0);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_polygon_entity_to_domain() {
        let mut entity = circle_entity();
        entity.shape_kind = "polygon".to_string();
        entity.ring = Some(serde_json::json!([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]));

        let geofence: Geofence = entity.into();
        match geofence.shape {
            GeofenceShape::Polygon { ring } => assert_eq!(ring.len(), 3),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_radius_degrades_to_empty_circle() {
        let mut entity = circle_entity();
        entity.radius_meters = None;

        let geofence: Geofence = entity.into();
        assert!(!domain::services::geometry::point_in_geofence(
            37.7749, -122.4194, &geofence
        ));
    }

    #[test]
    fn test_malformed_ring_degrades_to_empty_polygon() {
        let mut entity = circle_entity();
        entity.shape_kind = "polygon".to_string();
        entity.ring = Some(serde_json::json!("not a ring"));

        let geofence: Geofence = entity.into();
        match geofence.shape {
            GeofenceShape::Polygon { ring } => assert!(ring.is_empty()),
            other => panic!("expected polygon, got {other:?}"),
        }
    }
}

//! Pure geometric containment tests.
//!
//! Everything in this module is side-effect free and total: degenerate
//! input (missing radius, rings with fewer than 3 points) yields
//! `false`/`None` rather than an error, and callers treat "can't
//! compute" the same as "not contained".

use crate::models::{Geofence, GeofenceShape};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Kilometers per degree of latitude (and of longitude at the equator).
const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points in meters (haversine).
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// True iff the point lies within `radius_meters` of the center,
/// boundary inclusive. A non-positive radius contains nothing.
pub fn circle_contains(
    lat: f64,
    lon: f64,
    center_lat: f64,
    center_lon: f64,
    radius_meters: f64,
) -> bool {
    if radius_meters <= 0.0 {
        return false;
    }
    haversine_meters(lat, lon, center_lat, center_lon) <= radius_meters
}

/// Ray-casting point-in-polygon test.
///
/// `ring` holds `(lon, lat)` pairs (GIS convention); the query point is
/// `(lat, lon)`. The ring may be open or closed: indexing wraps modulo
/// the ring length, and a duplicated closing vertex only contributes a
/// zero-length edge that never straddles the query latitude. Rings with
/// fewer than 3 points contain nothing.
pub fn polygon_contains(lat: f64, lon: f64, ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    for i in 0..n {
        let (lon1, lat1) = ring[i];
        let (lon2, lat2) = ring[(i + 1) % n];

        // Edge straddles the query latitude?
        if (lat1 > lat) != (lat2 > lat) {
            // Longitude where the edge crosses that latitude.
            let crossing_lon = lon1 + (lat - lat1) / (lat2 - lat1) * (lon2 - lon1);
            if lon < crossing_lon {
                inside = !inside;
            }
        }
    }
    inside
}

/// Arithmetic mean of the ring's vertices as `(lat, lon)`.
///
/// Not area-weighted; good enough for center-of-mass display.
pub fn polygon_centroid(ring: &[(f64, f64)]) -> Option<(f64, f64)> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (lon_sum, lat_sum) = ring
        .iter()
        .fold((0.0, 0.0), |(lons, lats), (lon, lat)| (lons + lon, lats + lat));
    Some((lat_sum / n, lon_sum / n))
}

/// Approximate polygon area in square kilometers.
///
/// Shoelace formula over the ring with degrees converted to kilometers
/// (111 km per degree of latitude, 111·cos(center_lat) per degree of
/// longitude). Only valid for small regions; do not use for anything
/// spanning more than a few degrees.
pub fn polygon_area_km2(ring: &[(f64, f64)], center_lat: f64) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let km_per_deg_lon = KM_PER_DEGREE * center_lat.to_radians().cos();

    let mut sum = 0.0;
    for i in 0..n {
        let (lon1, lat1) = ring[i];
        let (lon2, lat2) = ring[(i + 1) % n];
        let x1 = lon1 * km_per_deg_lon;
        let y1 = lat1 * KM_PER_DEGREE;
        let x2 = lon2 * km_per_deg_lon;
        let y2 = lat2 * KM_PER_DEGREE;
        sum += x1 * y2 - x2 * y1;
    }
    (sum / 2.0).abs()
}

/// Dispatches to the circle or polygon test based on the geofence
/// shape. Inactive geofences contain nothing.
///
/// A polygon with a degenerate ring is logged and treated as empty
/// rather than erroring, so one misconfigured zone cannot take down
/// matching for the rest.
pub fn point_in_geofence(lat: f64, lon: f64, geofence: &Geofence) -> bool {
    if !geofence.active {
        return false;
    }
    match &geofence.shape {
        GeofenceShape::Circle {
            center_lat,
            center_lon,
            radius_meters,
        } => circle_contains(lat, lon, *center_lat, *center_lon, *radius_meters),
        GeofenceShape::Polygon { ring } => {
            if ring.len() < 3 {
                tracing::warn!(
                    geofence_id = %geofence.id,
                    vertices = ring.len(),
                    "Polygon geofence has a degenerate ring; treating as empty"
                );
                return false;
            }
            polygon_contains(lat, lon, ring)
        }
    }
}

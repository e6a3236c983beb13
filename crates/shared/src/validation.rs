//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that a circle radius is positive.
pub fn validate_radius(radius_meters: f64) -> Result<(), ValidationError> {
    if radius_meters > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("radius_range");
        err.message = Some("Radius must be positive".into());
        Err(err)
    }
}

/// Validates that an expiry timestamp lies strictly in the future.
pub fn validate_expiry(expires_at: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *expires_at > Utc::now() {
        Ok(())
    } else {
        let mut err = ValidationError::new("expiry_past");
        err.message = Some("Expiry must be in the future".into());
        Err(err)
    }
}

/// Returns true when a sample captured at `captured_at` is still fresh
/// under the given window. The boundary is inclusive: a sample aged
/// exactly `max_age_hours` still counts.
pub fn is_fresh(captured_at: &DateTime<Utc>, now: &DateTime<Utc>, max_age_hours: i64) -> bool {
    *captured_at >= *now - chrono::Duration::hours(max_age_hours)
}

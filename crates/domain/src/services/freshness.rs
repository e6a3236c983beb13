//! Freshness-windowed geofence matching.
//!
//! Answers "which subjects currently sit inside any of these zones",
//! where "currently" means their latest location sample is no older
//! than the configured window. Subjects without a fresh sample are
//! silently excluded; a stale-location subject never receives an area
//! alert. That is a deliberate precision/recall tradeoff.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{Geofence, LocationSample};
use crate::services::geometry;
use crate::storage::{LocationStore, StorageError};

/// A subject found inside a zone, with the sample that matched and the
/// zone it matched in.
#[derive(Debug, Clone)]
pub struct SubjectMatch {
    pub subject_id: Uuid,
    pub geofence_id: Uuid,
    pub sample: LocationSample,
}

/// Pure matching core.
///
/// `samples` must already be the latest sample per subject; samples
/// captured before `cutoff` are skipped (the boundary is inclusive:
/// `captured_at == cutoff` still counts). Each subject matches at most
/// once, against the first zone that contains it, so a subject sitting
/// in overlapping zones is not duplicated.
pub fn match_samples(
    samples: &[LocationSample],
    geofences: &[Geofence],
    cutoff: DateTime<Utc>,
) -> Vec<SubjectMatch> {
    let mut matches = Vec::new();
    for sample in samples {
        if sample.captured_at < cutoff {
            continue;
        }
        if let Some(fence) = geofences
            .iter()
            .find(|f| geometry::point_in_geofence(sample.latitude, sample.longitude, f))
        {
            matches.push(SubjectMatch {
                subject_id: sample.subject_id,
                geofence_id: fence.id,
                sample: sample.clone(),
            });
        }
    }
    matches
}

/// Store-backed freshness index.
///
/// Complexity is O(subjects x geofences); callers are expected to have
/// scoped the location store (by organization / zone ownership) before
/// this point rather than scanning a whole population.
#[derive(Clone)]
pub struct LocationFreshnessIndex {
    locations: Arc<dyn LocationStore>,
}

impl LocationFreshnessIndex {
    pub fn new(locations: Arc<dyn LocationStore>) -> Self {
        Self { locations }
    }

    /// Finds subjects whose latest sample is at most `max_age_hours`
    /// old and falls inside any of `geofences`.
    pub async fn find_subjects_in_geofences(
        &self,
        geofences: &[Geofence],
        max_age_hours: i64,
    ) -> Result<Vec<SubjectMatch>, StorageError> {
        let cutoff = Utc::now() - Duration::hours(max_age_hours);
        let samples = self.locations.latest_samples().await?;
        let matches = match_samples(&samples, geofences, cutoff);
        tracing::debug!(
            zones = geofences.len(),
            candidates = samples.len(),
            matched = matches.len(),
            "Freshness index matched subjects"
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeofenceShape;

    fn sample(subject_id: Uuid, lat: f64, lon: f64, captured_at: DateTime<Utc>) -> LocationSample {
        LocationSample {
            id: 0,
            subject_id,
            latitude: lat,
            longitude: lon,
            captured_at,
            created_at: captured_at,
        }
    }

    fn square_fence() -> Geofence {
        Geofence {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "campus".to_string(),
            shape: GeofenceShape::Polygon {
                ring: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            },
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_match_inside_fresh() {
        let now = Utc::now();
        let cutoff = now - Duration::hours(24);
        let subject = Uuid::new_v4();
        let samples = vec![sample(subject, 0.5, 0.5, now - Duration::hours(1))];

        let matches = match_samples(&samples, &[square_fence()], cutoff);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].subject_id, subject);
    }

    #[test]
    fn test_stale_sample_excluded() {
        let now = Utc::now();
        let cutoff = now - Duration::hours(24);
        let samples = vec![sample(Uuid::new_v4(), 0.5, 0.5, now - Duration::hours(25))];

        assert!(match_samples(&samples, &[square_fence()], cutoff).is_empty());
    }

    #[test]
    fn test_boundary_age_included() {
        let now = Utc::now();
        let cutoff = now - Duration::hours(24);
        let samples = vec![sample(Uuid::new_v4(), 0.5, 0.5, cutoff)];

        assert_eq!(match_samples(&samples, &[square_fence()], cutoff).len(), 1);
    }

    #[test]
    fn test_outside_excluded() {
        let now = Utc::now();
        let cutoff = now - Duration::hours(24);
        let samples = vec![sample(Uuid::new_v4(), 2.0, 2.0, now)];

        assert!(match_samples(&samples, &[square_fence()], cutoff).is_empty());
    }

    #[test]
    fn test_subject_counted_once_across_overlapping_zones() {
        let now = Utc::now();
        let cutoff = now - Duration::hours(24);
        let subject = Uuid::new_v4();
        let samples = vec![sample(subject, 0.5, 0.5, now)];
        let first = square_fence();
        let zones = vec![first.clone(), square_fence()];

        let matches = match_samples(&samples, &zones, cutoff);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].geofence_id, first.id);
    }

    #[tokio::test]
    async fn test_store_backed_index() {
        use crate::storage::memory::InMemoryStore;

        let store = Arc::new(InMemoryStore::new());
        let subject = Uuid::new_v4();
        store
            .record_sample(subject, 0.5, 0.5, Utc::now() - Duration::hours(1))
            .await;
        store
            .record_sample(Uuid::new_v4(), 0.5, 0.5, Utc::now() - Duration::hours(30))
            .await;

        let index = LocationFreshnessIndex::new(store);
        let matches = index
            .find_subjects_in_geofences(&[square_fence()], 24)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].subject_id, subject);
    }
}

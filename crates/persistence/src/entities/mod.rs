//! Entity definitions (database row mappings).

pub mod alert;
pub mod assignment;
pub mod case;
pub mod geofence;
pub mod incident;
pub mod location;
pub mod notification;
pub mod officer;

pub use alert::AlertEntity;
pub use assignment::AssignmentEntity;
pub use case::CaseEntity;
pub use geofence::GeofenceEntity;
pub use incident::IncidentEntity;
pub use location::LocationSampleEntity;
pub use notification::NotificationEntity;
pub use officer::OfficerEntity;

//! Repository implementations of the domain storage traits.

pub mod alert;
pub mod assignment;
pub mod case;
pub mod geofence;
pub mod incident;
pub mod location;
pub mod notification;
pub mod officer;

pub use alert::AlertRepository;
pub use assignment::AssignmentRepository;
pub use case::CaseRepository;
pub use geofence::GeofenceRepository;
pub use incident::IncidentRepository;
pub use location::LocationRepository;
pub use notification::NotificationRepository;
pub use officer::OfficerRepository;

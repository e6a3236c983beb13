//! Domain models for the Guardian SOS backend.

pub mod actor;
pub mod alert;
pub mod assignment;
pub mod case;
pub mod geofence;
pub mod incident;
pub mod location;
pub mod notification;
pub mod officer;

pub use actor::ActorCapabilities;
pub use alert::{AlertKind, AlertPriority, AlertStatus, AlertStatusSchema, OriginatorRole, SosAlert};
pub use assignment::OfficerGeofenceAssignment;
pub use case::{Case, CaseStatus};
pub use geofence::{Geofence, GeofenceShape};
pub use incident::{Incident, IncidentStatus};
pub use location::LocationSample;
pub use notification::{Notification, NotificationType};
pub use officer::Officer;

//! Engine services for the Guardian SOS backend.
//!
//! Data flow: an officer or user submits an alert with coordinates,
//! the authority guard validates it, the freshness index computes the
//! affected subjects for area alerts using the geometry kernel, the
//! lifecycle keeps alert/case/incident state consistent, and the
//! dispatcher fans notifications out to officers.

pub mod authority;
pub mod dispatch;
pub mod freshness;
pub mod geometry;
pub mod lifecycle;

pub use authority::{AreaAlertOutcome, AreaAlertRequest, GeofenceAuthorityGuard, PointAlertRequest};
pub use dispatch::{DispatchFanout, FanoutReport, MockPushChannel, PushChannel};
pub use freshness::{LocationFreshnessIndex, SubjectMatch};
pub use lifecycle::{apply_case_status_change, project_case_status, AlertLifecycle};

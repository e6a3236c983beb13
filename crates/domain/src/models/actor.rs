//! Actor capabilities resolved at the authorization boundary.

use uuid::Uuid;

/// Capability flags for the authenticated caller.
///
/// Resolved once (from the session, never from the request body) and
/// passed down into the engine instead of being re-derived ad hoc per
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorCapabilities {
    pub actor_id: Uuid,
    pub is_officer: bool,
    pub is_admin: bool,
    pub organization_id: Option<Uuid>,
}

impl ActorCapabilities {
    /// Capabilities of an ordinary end user.
    pub fn user(actor_id: Uuid, organization_id: Option<Uuid>) -> Self {
        Self {
            actor_id,
            is_officer: false,
            is_admin: false,
            organization_id,
        }
    }

    /// Capabilities of a security officer.
    pub fn officer(actor_id: Uuid, organization_id: Option<Uuid>) -> Self {
        Self {
            actor_id,
            is_officer: true,
            is_admin: false,
            organization_id,
        }
    }

    /// Capabilities of an organization administrator.
    pub fn admin(actor_id: Uuid, organization_id: Option<Uuid>) -> Self {
        Self {
            actor_id,
            is_officer: false,
            is_admin: true,
            organization_id,
        }
    }
}

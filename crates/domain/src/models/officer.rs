//! Security officer model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A security officer as the dispatch engine sees one: a notification
/// recipient with an optional push token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Option<Uuid>,
    pub active: bool,
    /// Push registration token; `None` means the officer only gets the
    /// durable notification row.
    pub push_token: Option<String>,
}

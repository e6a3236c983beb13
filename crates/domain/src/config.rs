//! Engine configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::models::AlertStatusSchema;

fn default_freshness_window_hours() -> i64 {
    24
}

fn default_push_timeout_ms() -> u64 {
    3_000
}

/// Tunables for the alert engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum age of a location sample that still counts for geofence
    /// matching.
    #[serde(default = "default_freshness_window_hours")]
    pub freshness_window_hours: i64,

    /// Which alert status schema this deployment runs.
    #[serde(default)]
    pub status_schema: AlertStatusSchema,

    /// Upper bound on a single push attempt, so fan-out across N
    /// officers completes in bounded time. A timed-out push counts as
    /// a failed push, not an error.
    #[serde(default = "default_push_timeout_ms")]
    pub push_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            freshness_window_hours: default_freshness_window_hours(),
            status_schema: AlertStatusSchema::default(),
            push_timeout_ms: default_push_timeout_ms(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `config/default.*` (optional) with
    /// `GUARDIAN__`-prefixed environment overrides, e.g.
    /// `GUARDIAN__ENGINE__FRESHNESS_WINDOW_HOURS=12`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("GUARDIAN").separator("__"))
            .build()?;

        // Engine settings live under an `engine` table; fall back to
        // defaults when the table is absent entirely.
        match config.get::<EngineConfig>("engine") {
            Ok(engine) => Ok(engine),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}

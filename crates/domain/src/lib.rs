//! Domain layer for the Guardian SOS backend.
//!
//! This crate contains:
//! - Domain models (Geofence, LocationSample, SosAlert, Case, Notification)
//! - The alert engine services (geometry, freshness matching, broadcast
//!   authority, alert lifecycle, notification fan-out)
//! - Storage trait contracts and an in-memory implementation
//! - Engine configuration and error types

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use config::EngineConfig;
pub use error::EngineError;

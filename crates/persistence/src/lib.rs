//! Persistence layer for the Guardian SOS backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain storage traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

use domain::storage::StorageError;

/// Maps a sqlx error onto the domain storage error type.
pub(crate) fn map_sqlx_err(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::RowNotFound => StorageError::NotFound("row not found".to_string()),
        other => StorageError::Backend(other.to_string()),
    }
}

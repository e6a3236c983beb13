//! Shared utilities and common types for the Guardian SOS backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Coordinate and timestamp validation logic

pub mod validation;

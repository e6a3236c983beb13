//! Engine error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the alert engine to its callers.
///
/// Geometry edge cases never reach this type (containment tests return
/// `false` locally), and fan-out failures are reported through
/// `FanoutReport` instead of failing the parent operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                parts.push(format!("{}: {}", field, message));
            }
        }
        parts.sort();
        EngineError::Validation(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(custom(function = "shared::validation::validate_latitude"))]
        latitude: f64,
    }

    #[test]
    fn test_validation_errors_flattened() {
        let probe = Probe { latitude: 95.0 };
        let err: EngineError = probe.validate().unwrap_err().into();
        match err {
            EngineError::Validation(msg) => {
                assert!(msg.contains("latitude"));
                assert!(msg.contains("between -90 and 90"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_storage_error_conversion() {
        let err: EngineError = StorageError::NotFound("alert".into()).into();
        assert!(matches!(err, EngineError::Storage(_)));
    }
}

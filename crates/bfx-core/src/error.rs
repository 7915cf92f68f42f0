//! Error types for bfx-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Input rejected before any network call.
    #[error("Invalid {field}: {value}")]
    Validation { field: &'static str, value: String },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl CoreError {
    pub fn validation(field: &'static str, value: impl Into<String>) -> Self {
        Self::Validation {
            field,
            value: value.into(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

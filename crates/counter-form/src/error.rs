//! # Form Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Form Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Core        │  │       Backend           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  RowOutOfRange  │  │  Http / NotFound        │ │
//! │  │  ConfigLoad     │  │  QuantityDisab. │  │  Validation / Status    │ │
//! │  │  ConfigSave     │  │  Validation     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend failures during loading and submission are logged and contained
//! by the controller; they surface as `FormError` only from setup paths.

use counter_client::ClientError;
use counter_core::CoreError;
use thiserror::Error;

/// Result type alias for form operations.
pub type FormResult<T> = Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid form configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// A row operation was rejected by the line-item rules.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for FormError {
    fn from(err: toml::de::Error) -> Self {
        FormError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for FormError {
    fn from(err: toml::ser::Error) -> Self {
        FormError::ConfigSaveFailed(err.to_string())
    }
}

impl FormError {
    /// True for errors caused by a bad row index, a locked field or a
    /// refused value, i.e. a caller mistake rather than an environment
    /// failure.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            FormError::Core(CoreError::RowOutOfRange { .. })
                | FormError::Core(CoreError::QuantityDisabled { .. })
                | FormError::Core(CoreError::Validation(_))
        )
    }
}

//! Typed errors for the diagnostics library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while ingesting or reprocessing a log.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// No extractor recognised the content
    #[error("unsupported file: {file_name}")]
    UnrecognizedFormat { file_name: String },

    /// No tenant could be resolved for the order
    #[error("could not resolve tenant for order {order_id}")]
    TenantUnresolved { order_id: Uuid },

    /// Reading not found in store
    #[error("reading not found: {id}")]
    ReadingNotFound { id: Uuid },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Fallback extraction service unavailable or failed
    #[error("fallback service error: {0}")]
    Fallback(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Fallback response did not match the field contract
    #[error("fallback response rejected: {reason}")]
    Schema { reason: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DiagnosticsError {
    /// Whether this error aborts the request.
    ///
    /// Fallback and schema errors only degrade the result; everything
    /// else is surfaced to the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Fallback(_) | Self::Schema { .. })
    }

    /// Message suitable for the upload surface.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnrecognizedFormat { .. } => {
                "unsupported file: no known diagnostic report format was found".to_string()
            }
            Self::TenantUnresolved { .. } => {
                "could not determine which organization owns this order".to_string()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn storage(e: impl std::fmt::Display) -> Self {
        Self::Storage(e.to_string().into())
    }
}

/// Result type alias for diagnostics operations.
pub type Result<T> = std::result::Result<T, DiagnosticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(DiagnosticsError::UnrecognizedFormat {
            file_name: "x.bin".into()
        }
        .is_fatal());
        assert!(DiagnosticsError::TenantUnresolved {
            order_id: Uuid::nil()
        }
        .is_fatal());
        assert!(DiagnosticsError::storage("disk full").is_fatal());
        assert!(!DiagnosticsError::Fallback("timeout".into()).is_fatal());
        assert!(!DiagnosticsError::Schema {
            reason: "extra key".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_unsupported_file_message() {
        let err = DiagnosticsError::UnrecognizedFormat {
            file_name: "photo.jpg".into(),
        };
        assert!(err.user_message().starts_with("unsupported file"));
    }
}

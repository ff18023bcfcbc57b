//! Field extraction service trait.
//!
//! Abstracts the external model-backed service that the fallback stage
//! calls when pattern extraction comes up short. Implementations return
//! the raw structured object; validating it against the field contract
//! is the pipeline's job.

use async_trait::async_trait;

use crate::error::{DiagnosticsError, Result};

/// External field-extraction service.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extract fields from a bounded excerpt of a log.
    ///
    /// Returns a JSON object keyed by field name. Transport failures are
    /// reported as `DiagnosticsError::Fallback`.
    async fn extract_fields(&self, excerpt: &str) -> Result<serde_json::Value>;
}

#[async_trait]
impl<T: FieldExtractor + ?Sized> FieldExtractor for std::sync::Arc<T> {
    async fn extract_fields(&self, excerpt: &str) -> Result<serde_json::Value> {
        (**self).extract_fields(excerpt).await
    }
}

#[async_trait]
impl<T: FieldExtractor + ?Sized> FieldExtractor for Box<T> {
    async fn extract_fields(&self, excerpt: &str) -> Result<serde_json::Value> {
        (**self).extract_fields(excerpt).await
    }
}

/// Extractor used when no service is configured. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledExtractor;

#[async_trait]
impl FieldExtractor for DisabledExtractor {
    async fn extract_fields(&self, _excerpt: &str) -> Result<serde_json::Value> {
        Err(DiagnosticsError::Fallback(
            "no field extraction service configured".into(),
        ))
    }
}

//! Request and result types for ingestion and reprocessing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields::ExtractedFields;
use super::reading::{CaptureStage, Reading, SourceFamily};
use crate::error::{DiagnosticsError, Result};
use crate::pipeline::score::ScoreBreakdown;

/// An uploaded log to ingest.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub order_id: Uuid,
    pub device_id: Uuid,

    /// Caller-supplied tenant; first in the resolution chain
    pub tenant_id: Option<Uuid>,

    pub stage: CaptureStage,
    pub file_name: String,
    pub content: String,
}

impl IngestRequest {
    /// Create a request without an explicit tenant.
    pub fn new(
        order_id: Uuid,
        device_id: Uuid,
        stage: CaptureStage,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            device_id,
            tenant_id: None,
            stage,
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Set the explicit tenant.
    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }
}

/// Identity/session metadata of the caller.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Tenant named by the authenticated session, if any
    pub session_tenant_id: Option<Uuid>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_tenant(mut self, tenant_id: Uuid) -> Self {
        self.session_tenant_id = Some(tenant_id);
        self
    }
}

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub reading: Reading,
    pub breakdown: ScoreBreakdown,
}

/// Result of a successful reprocess.
#[derive(Debug, Clone)]
pub struct ReprocessOutcome {
    pub reading_id: Uuid,
    pub source_family: SourceFamily,
    pub updated_fields: ExtractedFields,
    pub health_score: u8,
    pub fallback_used: bool,
}

/// Wire shape returned to the upload surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_fields: Option<ExtractedFields>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestResponse {
    fn failure(err: &DiagnosticsError) -> Self {
        Self {
            success: false,
            reading_id: None,
            health_score: None,
            extracted_fields: None,
            error: Some(err.user_message()),
        }
    }
}

impl From<&Result<IngestOutcome>> for IngestResponse {
    fn from(result: &Result<IngestOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                reading_id: Some(outcome.reading.id),
                health_score: Some(outcome.reading.health_score),
                extracted_fields: Some(outcome.reading.fields.clone()),
                error: None,
            },
            Err(e) => Self::failure(e),
        }
    }
}

/// Wire shape returned to the administrative reprocess action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReprocessResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_fields: Option<ExtractedFields>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<ReprocessOutcome>> for ReprocessResponse {
    fn from(result: &Result<ReprocessOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                health_score: Some(outcome.health_score),
                updated_fields: Some(outcome.updated_fields.clone()),
                error: None,
            },
            Err(e) => Self {
                success: false,
                health_score: None,
                updated_fields: None,
                error: Some(e.user_message()),
            },
        }
    }
}

/// Latest reading of one capture stage, for side-by-side views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSnapshot {
    pub stage: CaptureStage,
    pub reading_id: Uuid,
    pub health_score: u8,
    pub fields: ExtractedFields,
}

/// Read-time view of every reading of one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOverview {
    pub order_id: Uuid,

    /// Most recent reading per stage, in workflow order
    pub stages: Vec<StageSnapshot>,

    /// Most recent non-null value per field across all readings
    pub latest: ExtractedFields,

    pub reading_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_response_shape() {
        let result: Result<IngestOutcome> = Err(DiagnosticsError::UnrecognizedFormat {
            file_name: "notes.docx".into(),
        });
        let response = IngestResponse::from(&result);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("unsupported file"));
        assert!(json.get("healthScore").is_none());
    }
}

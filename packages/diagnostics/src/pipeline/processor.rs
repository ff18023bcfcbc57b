//! The Processor - main entry point of the library.
//!
//! Ingestion: sniff → pattern-extract → gate → [fallback → merge] →
//! score → compact → persist.
//!
//! Reprocessing: stored content → sniff → pattern-extract →
//! [fallback → merge] → score → overwrite derived fields.
//!
//! Everything is computed before the single store write, so a request
//! aborted midway leaves nothing behind.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{DiagnosticsError, Result};
use crate::pipeline::compact::{compact, Compaction};
use crate::pipeline::score::{score, ScoreBreakdown};
use crate::pipeline::sniff::{classify, sniff};
use crate::pipeline::stages::{run_stages, Extraction, ExtractionStage, FallbackStage, PatternStage};
use crate::pipeline::tenant::{resolve_tenant, TenantQuery};
use crate::pipeline::projection;
use crate::traits::{
    extractor::FieldExtractor,
    store::{OrderDirectory, ReadingStore},
};
use crate::types::{
    config::PipelineConfig,
    outcome::{IngestOutcome, IngestRequest, OrderOverview, ReprocessOutcome, RequestContext},
    reading::{DerivedUpdate, Reading, SourceFamily},
};

/// Extraction plus score for one piece of content.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub extraction: Extraction,
    pub breakdown: ScoreBreakdown,
}

/// Ingests, reprocesses and reports on diagnostic readings.
///
/// # Example
///
/// ```rust,ignore
/// let processor = Processor::new(MemoryStore::new(), DisabledExtractor);
///
/// let request = IngestRequest::new(order_id, device_id, CaptureStage::Initial, "aida.txt", content)
///     .with_tenant(tenant_id);
/// let outcome = processor.ingest(request, &RequestContext::new()).await?;
///
/// // Later, after the rule tables improved
/// processor.reprocess(outcome.reading.id).await?;
/// ```
pub struct Processor<S: ReadingStore + OrderDirectory, F: FieldExtractor> {
    store: S,
    extractor: F,
    config: PipelineConfig,
}

impl<S: ReadingStore + OrderDirectory, F: FieldExtractor> Processor<S, F> {
    /// Create a processor with the default configuration.
    pub fn new(store: S, extractor: F) -> Self {
        Self {
            store,
            extractor,
            config: PipelineConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(store: S, extractor: F, config: PipelineConfig) -> Self {
        Self {
            store,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PipelineConfig {
        &mut self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn extractor(&self) -> &F {
        &self.extractor
    }

    /// Sniff, extract and score `content` without touching the store.
    ///
    /// Fails with `UnrecognizedFormat` when the content scan gave up and
    /// nothing was extracted. A file-name hint alone never makes content
    /// recognizable.
    pub async fn analyze(&self, file_name: &str, content: &str) -> Result<Analysis> {
        let scanned = sniff(content);
        let sniffed = classify(file_name, content);

        let fallback = FallbackStage::new(&self.extractor, self.config.fallback_char_budget);
        let mut stages: Vec<&dyn ExtractionStage> = Vec::with_capacity(2);
        stages.push(&PatternStage);
        if self.config.fallback_enabled {
            stages.push(&fallback);
        }

        let extraction = run_stages(content, sniffed, &stages).await;

        if scanned == SourceFamily::Unknown && extraction.fields.is_empty() {
            return Err(DiagnosticsError::UnrecognizedFormat {
                file_name: file_name.to_string(),
            });
        }

        let breakdown = score(&extraction.fields);
        Ok(Analysis {
            extraction,
            breakdown,
        })
    }

    /// Ingest an uploaded log and persist a new reading.
    #[instrument(
        skip(self, request, context),
        fields(order_id = %request.order_id, stage = %request.stage, file_name = %request.file_name)
    )]
    pub async fn ingest(
        &self,
        request: IngestRequest,
        context: &RequestContext,
    ) -> Result<IngestOutcome> {
        let tenant = resolve_tenant(
            &TenantQuery {
                order_id: request.order_id,
                explicit: request.tenant_id,
                context,
            },
            &self.store,
        )
        .await?;

        let Analysis {
            extraction,
            breakdown,
        } = self.analyze(&request.file_name, &request.content).await?;

        let Compaction {
            content: raw_content,
            path,
            ..
        } = compact(&request.content, &self.config);

        let reading = Reading {
            id: Uuid::now_v7(),
            device_id: request.device_id,
            order_id: request.order_id,
            tenant_id: tenant.tenant_id,
            source_family: extraction.family,
            stage: request.stage,
            file_name: request.file_name,
            fields: extraction.fields,
            health_score: breakdown.score,
            fallback_used: extraction.fallback_used,
            content_hash: Reading::hash_content(&request.content),
            raw_content,
            created_at: Utc::now(),
            updated_at: None,
        };

        self.store.insert_reading(&reading).await?;

        info!(
            reading_id = %reading.id,
            family = %reading.source_family,
            fields_found = reading.fields.count(),
            score = reading.health_score,
            fallback_used = reading.fallback_used,
            compaction = ?path,
            "Reading ingested"
        );

        Ok(IngestOutcome { reading, breakdown })
    }

    /// Re-run extraction and scoring over a stored reading.
    ///
    /// Only derived fields are rewritten; the stored log is never
    /// recompacted.
    #[instrument(skip(self), fields(reading_id = %id))]
    pub async fn reprocess(&self, id: Uuid) -> Result<ReprocessOutcome> {
        let reading = self
            .store
            .get_reading(id)
            .await?
            .ok_or(DiagnosticsError::ReadingNotFound { id })?;

        let Analysis {
            extraction,
            breakdown,
        } = self.analyze(&reading.file_name, &reading.raw_content).await?;

        let update = DerivedUpdate {
            source_family: extraction.family,
            fields: extraction.fields,
            health_score: breakdown.score,
            fallback_used: extraction.fallback_used,
            updated_at: Utc::now(),
        };

        if !self.store.update_derived(id, &update).await? {
            return Err(DiagnosticsError::ReadingNotFound { id });
        }

        info!(
            reading_id = %id,
            family = %update.source_family,
            fields_found = update.fields.count(),
            score = update.health_score,
            fallback_used = update.fallback_used,
            "Reading reprocessed"
        );

        Ok(ReprocessOutcome {
            reading_id: id,
            source_family: update.source_family,
            updated_fields: update.fields,
            health_score: update.health_score,
            fallback_used: update.fallback_used,
        })
    }

    /// Readings of an order grouped by stage, plus the latest-value view.
    pub async fn order_overview(&self, order_id: Uuid) -> Result<OrderOverview> {
        let readings = self.store.readings_for_order(order_id).await?;
        Ok(projection::order_overview(order_id, &readings))
    }
}

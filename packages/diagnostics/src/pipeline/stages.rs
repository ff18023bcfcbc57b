//! Extraction stages and the orchestrator that drives them.
//!
//! Each stage sees the content, the current family and the record built
//! so far, and returns its own partial record plus a completeness signal.
//! The orchestrator merges stage output in order (earlier stages win) and
//! stops at the first stage that reports the record complete.

use async_trait::async_trait;
use tracing::debug;

use crate::extractors;
use crate::pipeline::{fallback, gate, merge};
use crate::traits::extractor::FieldExtractor;
use crate::types::fields::{ExtractedFields, Field};
use crate::types::reading::SourceFamily;

/// What a stage works on.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    pub content: &'a str,
    pub family: SourceFamily,

    /// Record merged from the stages that already ran
    pub so_far: &'a ExtractedFields,
}

/// What a stage produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutput {
    pub fields: ExtractedFields,

    /// Family reclassification, honoured only for an unknown sniff
    pub family: Option<SourceFamily>,

    /// The stage ran without error
    pub success: bool,

    /// The merged record passes the completeness gate
    pub complete: bool,
}

/// Kind of stage, for bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Pattern,
    Fallback,
}

/// One step of the extraction cascade.
#[async_trait]
pub trait ExtractionStage: Send + Sync {
    fn kind(&self) -> StageKind;

    async fn run(&self, input: StageInput<'_>) -> StageOutput;
}

fn complete_with(input: &StageInput<'_>, fields: &ExtractedFields) -> bool {
    let mut merged = input.so_far.clone();
    merged.fill_missing_from(fields);
    gate::is_complete(input.family, &merged)
}

/// Rule-table extraction for the sniffed family.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStage;

#[async_trait]
impl ExtractionStage for PatternStage {
    fn kind(&self) -> StageKind {
        StageKind::Pattern
    }

    async fn run(&self, input: StageInput<'_>) -> StageOutput {
        let extraction = extractors::extract(input.family, input.content);
        let complete = complete_with(&input, &extraction.fields);
        StageOutput {
            fields: extraction.fields,
            family: None,
            success: extraction.success,
            complete,
        }
    }
}

/// Model-based extraction over a bounded excerpt.
pub struct FallbackStage<'a, F: ?Sized> {
    extractor: &'a F,
    char_budget: usize,
}

impl<'a, F: FieldExtractor + ?Sized> FallbackStage<'a, F> {
    pub fn new(extractor: &'a F, char_budget: usize) -> Self {
        Self {
            extractor,
            char_budget,
        }
    }
}

#[async_trait]
impl<'a, F: FieldExtractor + ?Sized> ExtractionStage for FallbackStage<'a, F> {
    fn kind(&self) -> StageKind {
        StageKind::Fallback
    }

    async fn run(&self, input: StageInput<'_>) -> StageOutput {
        let out = fallback::run(self.extractor, input.content, self.char_budget).await;
        let complete = complete_with(&input, &out.fields);
        StageOutput {
            fields: out.fields,
            family: out.family,
            success: out.success,
            complete,
        }
    }
}

/// Final result of the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub family: SourceFamily,
    pub fields: ExtractedFields,

    /// A fallback stage ran and returned a usable response
    pub fallback_used: bool,

    /// Fields sourced from the fallback stage
    pub from_fallback: Vec<Field>,

    /// Stages that ran, in order
    pub stages_run: Vec<StageKind>,
}

/// Run `stages` in order with early exit on completeness.
pub async fn run_stages(
    content: &str,
    sniffed: SourceFamily,
    stages: &[&dyn ExtractionStage],
) -> Extraction {
    let mut result = Extraction {
        family: sniffed,
        fields: ExtractedFields::new(),
        fallback_used: false,
        from_fallback: Vec::new(),
        stages_run: Vec::new(),
    };

    for stage in stages {
        let kind = stage.kind();
        let out = stage
            .run(StageInput {
                content,
                family: result.family,
                so_far: &result.fields,
            })
            .await;
        result.stages_run.push(kind);

        let merged = merge::merge(result.family, &result.fields, &out.fields, out.family);
        if kind == StageKind::Fallback && out.success {
            result.fallback_used = true;
            result.from_fallback.extend(merged.from_fallback.iter().copied());
        }
        result.fields = merged.fields;
        result.family = merged.family;

        debug!(
            stage = ?kind,
            success = out.success,
            complete = out.complete,
            fields_found = result.fields.count(),
            "Extraction stage finished"
        );

        if out.complete {
            break;
        }
    }

    result
}

//! Ingestion pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Format sniffing (family signatures, file-name hints)
//! - Pattern extraction and the completeness gate
//! - Semantic fallback and merge resolution
//! - Health scoring
//! - Log compaction before persistence
//! - Tenant resolution, ingest and reprocess flows

pub mod compact;
pub mod fallback;
pub mod gate;
pub mod merge;
pub mod processor;
pub mod projection;
pub mod score;
pub mod sniff;
pub mod stages;
pub mod tenant;

pub use compact::{compact, Compaction, CompactionPath, SectionKind};
pub use fallback::{FallbackExtraction, FallbackSchema};
pub use gate::{is_complete, missing_essentials};
pub use merge::{merge, Merged};
pub use processor::{Analysis, Processor};
pub use projection::{latest_values, order_overview, stage_snapshots};
pub use score::{health_score, score, ScoreBreakdown};
pub use sniff::{classify, sniff};
pub use stages::{
    run_stages, Extraction, ExtractionStage, FallbackStage, PatternStage, StageInput, StageKind,
    StageOutput,
};
pub use tenant::{resolve_tenant, ResolvedTenant, TenantQuery, TenantSource};

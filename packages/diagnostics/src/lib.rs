//! Hardware Diagnostic Log Ingestion Library
//!
//! Turns diagnostic logs uploaded by repair technicians (CrystalDiskInfo,
//! smartctl, AIDA64, HWiNFO, HWMonitor, in English or Portuguese) into
//! structured hardware readings with a 0-100 health score.
//!
//! # Design Philosophy
//!
//! **"Rules first, model second"**
//!
//! - Deterministic rule tables per source family do the bulk of the work
//! - A semantic fallback only runs when essential fields are missing
//! - Pattern values always win over fallback values
//! - Stored logs are compacted, and can be reprocessed later
//!
//! # Usage
//!
//! ```rust,ignore
//! use diagnostics::{CaptureStage, DisabledExtractor, IngestRequest, MemoryStore, Processor, RequestContext};
//!
//! let store = MemoryStore::new();
//! store.register_order_owner(order_id, tenant_id);
//! let processor = Processor::new(store, DisabledExtractor);
//!
//! let request = IngestRequest::new(order_id, device_id, CaptureStage::Initial, "CrystalDiskInfo.txt", log);
//! let outcome = processor.ingest(request, &RequestContext::new()).await?;
//! println!("health: {}", outcome.reading.health_score);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (FieldExtractor, ReadingStore, OrderDirectory)
//! - [`types`] - Readings, extracted fields, requests and outcomes
//! - [`extractors`] - Per-family rule tables
//! - [`pipeline`] - Sniffing, gating, fallback, merge, scoring, compaction
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore, PostgresStore)
//! - [`testing`] - Mock implementations and sample logs for testing

pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{DiagnosticsError, Result};
pub use pipeline::{Analysis, Processor, ScoreBreakdown};
pub use traits::{
    extractor::{DisabledExtractor, FieldExtractor},
    store::{OrderDirectory, ReadingStore},
};
pub use types::{
    config::PipelineConfig,
    fields::{ExtractedFields, Field, FieldKind, FieldValue},
    outcome::{
        IngestOutcome, IngestRequest, IngestResponse, OrderOverview, ReprocessOutcome,
        ReprocessResponse, RequestContext, StageSnapshot,
    },
    reading::{CaptureStage, DerivedUpdate, Reading, SourceFamily},
};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

#[cfg(feature = "openai")]
pub use ai::OpenAiFieldExtractor;

// Re-export testing utilities
pub use testing::MockFieldExtractor;

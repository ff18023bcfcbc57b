//! Configuration types for the ingestion pipeline.

use serde::{Deserialize, Serialize};

/// Configuration for ingestion and reprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Characters of content sent to the fallback service.
    ///
    /// Bounds latency and cost of the model call. Default: 15,000.
    pub fallback_char_budget: usize,

    /// Run the fallback stage when pattern extraction is incomplete.
    ///
    /// Default: true.
    pub fallback_enabled: bool,

    /// Logs with at most this many lines are stored without section
    /// compaction. Default: 500.
    pub compaction_min_lines: usize,

    /// Lines kept ahead of the first section header of a large log.
    ///
    /// Default: 40.
    pub preamble_lines: usize,

    /// Compaction output below this many lines counts as a misfire.
    ///
    /// Default: 50.
    pub min_surviving_lines: usize,

    /// Lines kept by the safety truncation. Default: 500.
    pub truncate_to_lines: usize,

    /// Absolute cap on stored raw content, in characters.
    ///
    /// Default: 200,000.
    pub max_stored_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fallback_char_budget: 15_000,
            fallback_enabled: true,
            compaction_min_lines: 500,
            preamble_lines: 40,
            min_surviving_lines: 50,
            truncate_to_lines: 500,
            max_stored_chars: 200_000,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback character budget.
    pub fn with_fallback_char_budget(mut self, budget: usize) -> Self {
        self.fallback_char_budget = budget;
        self
    }

    /// Disable the fallback stage entirely.
    pub fn without_fallback(mut self) -> Self {
        self.fallback_enabled = false;
        self
    }

    /// Set the absolute stored-content cap.
    pub fn with_max_stored_chars(mut self, max: usize) -> Self {
        self.max_stored_chars = max;
        self
    }

    /// Set the compaction thresholds.
    pub fn with_compaction(mut self, min_lines: usize, min_surviving: usize, truncate_to: usize) -> Self {
        self.compaction_min_lines = min_lines;
        self.min_surviving_lines = min_surviving;
        self.truncate_to_lines = truncate_to;
        self
    }
}

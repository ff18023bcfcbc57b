//! Reading types - one persisted record per processed log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::fields::ExtractedFields;

/// Vendor/tool category a log is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFamily {
    /// Disk health reporters (CrystalDiskInfo, smartctl)
    DiskHealth,
    /// System sensor reports (AIDA64, HWiNFO)
    SensorReport,
    /// Hardware monitor exports (HWMonitor)
    MonitorReport,
    Unknown,
}

impl SourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DiskHealth => "disk-health",
            Self::SensorReport => "sensor-report",
            Self::MonitorReport => "monitor-report",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a family name, accepting a few spellings the fallback
    /// service tends to produce.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "disk-health" | "disk" | "smart" => Some(Self::DiskHealth),
            "sensor-report" | "sensor" | "sensors" => Some(Self::SensorReport),
            "monitor-report" | "monitor" | "hardware-monitor" => Some(Self::MonitorReport),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point in the repair workflow at which a reading was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStage {
    Initial,
    PostRepair,
    Final,
}

impl CaptureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::PostRepair => "post_repair",
            Self::Final => "final",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "initial" => Some(Self::Initial),
            "post_repair" => Some(Self::PostRepair),
            "final" => Some(Self::Final),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaptureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: Uuid,

    /// Equipment the log was captured from
    pub device_id: Uuid,

    /// Work order the reading belongs to
    pub order_id: Uuid,

    pub tenant_id: Uuid,

    pub source_family: SourceFamily,

    pub stage: CaptureStage,

    /// Name of the uploaded file
    pub file_name: String,

    #[serde(flatten)]
    pub fields: ExtractedFields,

    /// 0-100, or 0 when no scoring dimension was present
    pub health_score: u8,

    /// Whether the fallback service contributed to `fields`
    pub fallback_used: bool,

    /// Compacted source log
    pub raw_content: String,

    /// SHA-256 of the original, uncompacted upload
    pub content_hash: String,

    pub created_at: DateTime<Utc>,

    /// Set when the reading was last reprocessed
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reading {
    /// Calculate SHA-256 hash of content.
    pub fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Overwrite the derived fields in place.
    pub fn apply(&mut self, update: &DerivedUpdate) {
        self.source_family = update.source_family;
        self.fields = update.fields.clone();
        self.health_score = update.health_score;
        self.fallback_used = update.fallback_used;
        self.updated_at = Some(update.updated_at);
    }
}

/// Derived fields written back by the reprocessor.
///
/// Deliberately has no raw content: reprocessing never rewrites the log.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedUpdate {
    pub source_family: SourceFamily,
    pub fields: ExtractedFields,
    pub health_score: u8,
    pub fallback_used: bool,
    pub updated_at: DateTime<Utc>,
}

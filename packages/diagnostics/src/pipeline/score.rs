//! Health scoring - weighted aggregation over the dimensions present.
//!
//! | Dimension | Source                  | Value                              | Weight |
//! |-----------|-------------------------|------------------------------------|--------|
//! | storage   | `ssd_health_percent`    | as reported                        | 0.4    |
//! | thermal   | `cpu_temp_max_c`        | `100 - max(0, t - 50)`, clamped    | 0.3    |
//! | battery   | `battery_wear_percent`  | `100 - wear`, clamped              | 0.3    |
//!
//! Missing dimensions drop out of both numerator and denominator. With no
//! dimension at all the score is 0, which is a "no data" marker and never
//! a perfect default.

use serde::{Deserialize, Serialize};

use crate::types::fields::ExtractedFields;

pub const STORAGE_WEIGHT: f64 = 0.4;
pub const THERMAL_WEIGHT: f64 = 0.3;
pub const BATTERY_WEIGHT: f64 = 0.3;

/// CPU temperature above which the thermal dimension loses points.
pub const THERMAL_THRESHOLD_C: f64 = 50.0;

/// Per-dimension values (each 0-100) and the aggregate score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,

    /// Aggregate 0-100; 0 when no dimension is present
    pub score: u8,
}

impl ScoreBreakdown {
    /// True if at least one dimension contributed.
    pub fn has_data(&self) -> bool {
        self.storage.is_some() || self.thermal.is_some() || self.battery.is_some()
    }

    /// Number of dimensions that contributed.
    pub fn dimensions(&self) -> usize {
        [self.storage, self.thermal, self.battery]
            .iter()
            .filter(|d| d.is_some())
            .count()
    }
}

/// Score a record.
pub fn score(fields: &ExtractedFields) -> ScoreBreakdown {
    let storage = fields
        .ssd_health_percent
        .map(|pct| (pct as f64).clamp(0.0, 100.0));
    let thermal = fields.cpu_temp_max_c.map(|t| {
        let over = (t as f64 - THERMAL_THRESHOLD_C).max(0.0);
        (100.0 - over).clamp(0.0, 100.0)
    });
    let battery = fields
        .battery_wear_percent
        .map(|wear| (100.0 - wear).clamp(0.0, 100.0));

    let weighted = [
        (storage, STORAGE_WEIGHT),
        (thermal, THERMAL_WEIGHT),
        (battery, BATTERY_WEIGHT),
    ];
    let (sum, weights) = weighted
        .iter()
        .filter_map(|(value, weight)| value.map(|v| (v * weight, *weight)))
        .fold((0.0, 0.0), |(s, w), (v, wt)| (s + v, w + wt));

    let score = if weights > 0.0 {
        (sum / weights).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    ScoreBreakdown {
        storage,
        thermal,
        battery,
        score,
    }
}

/// Score a record, aggregate only.
pub fn health_score(fields: &ExtractedFields) -> u8 {
    score(fields).score
}

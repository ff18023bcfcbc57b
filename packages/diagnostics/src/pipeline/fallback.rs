//! Semantic fallback - model-based extraction when patterns fall short.
//!
//! The content is cut to a fixed character budget, sent to the injected
//! `FieldExtractor`, and the response is checked against the field
//! contract: an object whose keys are the declared field names (plus
//! `source_family`). Sentinel values such as `"n/a"` are dropped, never
//! stored. Every failure of this stage is logged and swallowed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DiagnosticsError, Result};
use crate::extractors::Normalizer;
use crate::traits::extractor::FieldExtractor;
use crate::types::fields::{ExtractedFields, Field, FieldKind, FieldValue};
use crate::types::reading::SourceFamily;

/// Key carrying the family classification in a fallback response.
pub const SOURCE_FAMILY_KEY: &str = "source_family";

/// Values treated as "not present".
pub const SENTINELS: &[&str] = &[
    "",
    "null",
    "n/a",
    "na",
    "none",
    "unknown",
    "not applicable",
    "desconhecido",
    "não disponível",
    "nao disponivel",
    "-",
];

/// Response shape requested from the extraction service.
///
/// Used to generate the strict JSON schema sent with each request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FallbackSchema {
    /// Processor model name, e.g. "Intel Core i5-8250U"
    pub cpu_model: Option<String>,
    /// Motherboard or laptop model name
    pub motherboard_model: Option<String>,
    /// Primary graphics adapter name
    pub gpu_model: Option<String>,
    /// Installed memory in gigabytes
    pub ram_total_gb: Option<f64>,
    /// Memory speed in MHz
    pub ram_speed_mhz: Option<f64>,
    /// Number of memory slots or populated modules
    pub ram_slots: Option<f64>,
    /// Disk health in percent (0-100)
    pub ssd_health_percent: Option<f64>,
    /// Disk capacity in gigabytes
    pub ssd_total_gb: Option<f64>,
    /// Total host writes in gigabytes
    pub ssd_total_bytes_written_gb: Option<f64>,
    /// Highest CPU temperature in Celsius
    pub cpu_temp_max_c: Option<f64>,
    /// Battery wear level in percent (0-100)
    pub battery_wear_percent: Option<f64>,
    /// Battery charge cycle count
    pub battery_cycles: Option<f64>,
    /// One of "disk-health", "sensor-report", "monitor-report", "unknown"
    pub source_family: Option<String>,
}

/// Output of the fallback stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackExtraction {
    pub fields: ExtractedFields,

    /// Family named by the service, if it named a known one
    pub family: Option<SourceFamily>,

    /// False when the service failed or its response was rejected
    pub success: bool,
}

impl FallbackExtraction {
    fn failed() -> Self {
        Self::default()
    }
}

/// Longest prefix of `content` within `budget` characters.
pub fn excerpt(content: &str, budget: usize) -> &str {
    match content.char_indices().nth(budget) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Whether a string value means "no value".
pub fn is_sentinel(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    SENTINELS.contains(&lowered.as_str())
}

/// Validate a service response against the field contract.
pub fn parse_response(value: &Value) -> Result<FallbackExtraction> {
    let Value::Object(map) = value else {
        return Err(DiagnosticsError::Schema {
            reason: format!("expected an object, got {}", type_name(value)),
        });
    };

    let mut out = FallbackExtraction {
        success: true,
        ..Default::default()
    };

    for (key, raw) in map {
        if key == SOURCE_FAMILY_KEY {
            out.family = match raw {
                Value::Null => None,
                Value::String(s) if is_sentinel(s) => None,
                Value::String(s) => SourceFamily::parse(s),
                other => {
                    return Err(DiagnosticsError::Schema {
                        reason: format!("{key}: expected a string, got {}", type_name(other)),
                    })
                }
            };
            continue;
        }

        let field = Field::from_name(key).ok_or_else(|| DiagnosticsError::Schema {
            reason: format!("unexpected key {key:?}"),
        })?;

        if let Some(value) = field_value(field, raw)? {
            if !out.fields.set(field, value) {
                debug!(field = %field, "Dropping fallback value that does not fit the field");
            }
        }
    }

    Ok(out)
}

/// Coerce one raw value. `Ok(None)` means the value was a sentinel or
/// implausible and is dropped.
fn field_value(field: Field, raw: &Value) -> Result<Option<FieldValue>> {
    let mismatch = |expected: &str| DiagnosticsError::Schema {
        reason: format!("{field}: expected {expected}, got {}", type_name(raw)),
    };

    match (field.kind(), raw) {
        (_, Value::Null) => Ok(None),
        (_, Value::String(s)) if is_sentinel(s) => Ok(None),
        (FieldKind::Text, Value::String(s)) => Ok(Normalizer::Text.to_text(s).map(FieldValue::Text)),
        (FieldKind::Text, _) => Err(mismatch("a string")),
        (_, Value::Number(n)) => {
            let n = n.as_f64().ok_or_else(|| mismatch("a finite number"))?;
            Ok(plausible(field, &n.to_string()))
        }
        (_, Value::String(s)) => {
            if !s.chars().any(|c| c.is_ascii_digit()) {
                return Err(mismatch("a number"));
            }
            Ok(plausible(field, s))
        }
        _ => Err(mismatch("a number")),
    }
}

/// Apply the same bounds the pattern normalizers enforce.
fn plausible(field: Field, raw: &str) -> Option<FieldValue> {
    let normalizer = match field {
        Field::SsdHealthPercent | Field::BatteryWearPercent => Normalizer::Percent,
        Field::CpuTempMaxC => Normalizer::TemperatureC,
        _ => Normalizer::Number,
    };
    let n = normalizer.to_number(raw, None)?;
    (n >= 0.0 || field == Field::CpuTempMaxC).then_some(FieldValue::Fractional(n))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Run the fallback stage. Never fails: errors yield `success = false`.
pub async fn run<F>(extractor: &F, content: &str, char_budget: usize) -> FallbackExtraction
where
    F: FieldExtractor + ?Sized,
{
    let excerpt = excerpt(content, char_budget);
    debug!(
        excerpt_chars = excerpt.chars().count(),
        "Requesting fallback extraction"
    );

    let response = match extractor.extract_fields(excerpt).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Fallback extraction failed, continuing with pattern results");
            return FallbackExtraction::failed();
        }
    };

    match parse_response(&response) {
        Ok(parsed) => {
            debug!(
                fields_found = parsed.fields.count(),
                family = ?parsed.family,
                "Fallback extraction finished"
            );
            parsed
        }
        Err(e) => {
            warn!(error = %e, "Fallback response rejected, continuing with pattern results");
            FallbackExtraction::failed()
        }
    }
}

//! Pattern extractors - one declarative rule table per source family.
//!
//! A rule table is an ordered list of `(field, patterns, normalizer)`
//! tuples. `RuleTable::extract` runs the same cascade for every family:
//! for each field, patterns are tried in order and the first one that
//! yields a normalizable value wins. Later rules for a field that is
//! already present are skipped, so a table can list a precise rule
//! first and a coarser one (say, counting DIMM entries) after it.
//!
//! Patterns capture the value in a `value` group and, optionally, its
//! unit in a `unit` group. The placeholder `{sep}` expands to the
//! label/value separator shared by all report formats (a colon, tabs,
//! or a run of two or more spaces).
//!
//! Portuguese label alternatives sit in a `pt` group. A value matched
//! through one is read with `,` as the decimal mark, so `1,536 TB` under
//! `Gravações do Host` is 1.536 TB rather than 1536 TB.

pub mod disk_health;
pub mod monitor_report;
pub mod normalize;
pub mod sensor_report;

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::fields::{ExtractedFields, Field, FieldValue};
use crate::types::reading::SourceFamily;
pub use normalize::{parse_number, parse_number_with, DecimalMark, Normalizer, SizeUnit};

/// Label/value separator substituted for `{sep}`.
const SEP: &str = r"(?:[ \t]*[:=][ \t]*|\t+[ \t]*|[ ]{2,})";

/// How multiple matches of one pattern are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// First normalizable match
    First,
    /// Largest normalized value across all matches
    Max,
    /// Sum of normalized values across all matches
    Sum,
    /// Number of distinct captured values
    Count,
}

/// One row of a rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub patterns: &'static [&'static str],
    pub normalizer: Normalizer,
    pub pick: Pick,
}

impl FieldRule {
    /// Rule keeping the first match.
    pub const fn first(
        field: Field,
        normalizer: Normalizer,
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            field,
            patterns,
            normalizer,
            pick: Pick::First,
        }
    }

    /// Rule combining all matches.
    pub const fn combine(
        field: Field,
        normalizer: Normalizer,
        pick: Pick,
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            field,
            patterns,
            normalizer,
            pick,
        }
    }
}

struct CompiledRule {
    field: Field,
    patterns: Vec<Regex>,
    normalizer: Normalizer,
    pick: Pick,
}

/// Output of one pattern-extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternExtraction {
    pub fields: ExtractedFields,

    /// True iff at least one field was extracted
    pub success: bool,
}

/// A compiled rule table for one family.
pub struct RuleTable {
    family: SourceFamily,
    rules: Vec<CompiledRule>,
}

impl RuleTable {
    /// Compile a table. Patterns are static, so a bad one is a bug.
    pub fn compile(family: SourceFamily, rules: &[FieldRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| CompiledRule {
                field: rule.field,
                patterns: rule
                    .patterns
                    .iter()
                    .map(|p| {
                        Regex::new(&p.replace("{sep}", SEP))
                            .unwrap_or_else(|e| panic!("invalid rule pattern {p:?}: {e}"))
                    })
                    .collect(),
                normalizer: rule.normalizer,
                pick: rule.pick,
            })
            .collect();

        Self { family, rules }
    }

    pub fn family(&self) -> SourceFamily {
        self.family
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the cascade over `content`.
    pub fn extract(&self, content: &str) -> PatternExtraction {
        let mut fields = ExtractedFields::new();

        for rule in &self.rules {
            if fields.has(rule.field) {
                continue;
            }
            for pattern in &rule.patterns {
                if let Some(value) = apply_pattern(pattern, rule.normalizer, rule.pick, content) {
                    if fields.set(rule.field, value) {
                        break;
                    }
                }
            }
        }

        let success = !fields.is_empty();
        debug!(
            family = %self.family,
            fields_found = fields.count(),
            "Pattern extraction finished"
        );

        PatternExtraction { fields, success }
    }
}

fn apply_pattern(
    pattern: &Regex,
    normalizer: Normalizer,
    pick: Pick,
    content: &str,
) -> Option<FieldValue> {
    if normalizer.is_text() {
        return pattern
            .captures_iter(content)
            .filter_map(|caps| caps.name("value"))
            .find_map(|m| normalizer.to_text(m.as_str()))
            .map(FieldValue::Text);
    }

    let numbers = pattern.captures_iter(content).filter_map(|caps| {
        let value = caps.name("value")?;
        let unit = caps.name("unit").map(|u| u.as_str());
        let mark = if caps.name("pt").is_some() {
            DecimalMark::Comma
        } else {
            DecimalMark::Auto
        };
        normalizer
            .to_number_with(value.as_str(), unit, mark)
            .map(|n| (value.as_str().to_string(), n))
    });

    let combined = match pick {
        Pick::First => numbers.map(|(_, n)| n).next(),
        Pick::Max => numbers.map(|(_, n)| n).reduce(f64::max),
        Pick::Sum => numbers.map(|(_, n)| n).reduce(|a, b| a + b),
        Pick::Count => {
            let distinct: HashSet<String> = numbers.map(|(raw, _)| raw).collect();
            (!distinct.is_empty()).then(|| distinct.len() as f64)
        }
    }?;

    Some(FieldValue::Fractional(combined))
}

static DISK_HEALTH: LazyLock<RuleTable> =
    LazyLock::new(|| RuleTable::compile(SourceFamily::DiskHealth, disk_health::RULES));

static SENSOR_REPORT: LazyLock<RuleTable> =
    LazyLock::new(|| RuleTable::compile(SourceFamily::SensorReport, sensor_report::RULES));

static MONITOR_REPORT: LazyLock<RuleTable> =
    LazyLock::new(|| RuleTable::compile(SourceFamily::MonitorReport, monitor_report::RULES));

/// Union of every family's rules, tried when the sniffer gave up.
static GENERIC: LazyLock<RuleTable> = LazyLock::new(|| {
    let rules: Vec<FieldRule> = disk_health::RULES
        .iter()
        .chain(sensor_report::RULES)
        .chain(monitor_report::RULES)
        .copied()
        .collect();
    RuleTable::compile(SourceFamily::Unknown, &rules)
});

/// Rule table for a family; `Unknown` maps to the generic table.
pub fn table_for(family: SourceFamily) -> &'static RuleTable {
    match family {
        SourceFamily::DiskHealth => &DISK_HEALTH,
        SourceFamily::SensorReport => &SENSOR_REPORT,
        SourceFamily::MonitorReport => &MONITOR_REPORT,
        SourceFamily::Unknown => &GENERIC,
    }
}

/// Pattern-extract `content` with the family's rule table.
pub fn extract(family: SourceFamily, content: &str) -> PatternExtraction {
    table_for(family).extract(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_compile() {
        for family in [
            SourceFamily::DiskHealth,
            SourceFamily::SensorReport,
            SourceFamily::MonitorReport,
            SourceFamily::Unknown,
        ] {
            let table = table_for(family);
            assert!(!table.is_empty(), "{family} table is empty");
            assert_eq!(table.family(), family);
        }
        assert_eq!(
            table_for(SourceFamily::Unknown).len(),
            disk_health::RULES.len() + sensor_report::RULES.len() + monitor_report::RULES.len()
        );
    }

    #[test]
    fn test_first_pattern_wins() {
        static RULES: &[FieldRule] = &[FieldRule::first(
            Field::CpuModel,
            Normalizer::Text,
            &[r"(?m)^Primary{sep}(?P<value>.+)$", r"(?m)^Secondary{sep}(?P<value>.+)$"],
        )];
        let table = RuleTable::compile(SourceFamily::Unknown, RULES);

        let out = table.extract("Secondary: B\nPrimary: A\n");
        assert_eq!(out.fields.cpu_model.as_deref(), Some("A"));

        let out = table.extract("Secondary: B\n");
        assert_eq!(out.fields.cpu_model.as_deref(), Some("B"));
    }

    #[test]
    fn test_unnormalizable_match_falls_through() {
        static RULES: &[FieldRule] = &[FieldRule::first(
            Field::SsdHealthPercent,
            Normalizer::Percent,
            &[r"(?m)^Health{sep}(?P<value>\S+)"],
        )];
        let table = RuleTable::compile(SourceFamily::Unknown, RULES);

        let out = table.extract("Health: unknown\nHealth: 88\n");
        assert_eq!(out.fields.ssd_health_percent, Some(88));
        assert!(out.success);

        let out = table.extract("nothing here");
        assert!(!out.success);
        assert!(out.fields.is_empty());
    }

    #[test]
    fn test_portuguese_label_reads_decimal_comma() {
        static RULES: &[FieldRule] = &[FieldRule::first(
            Field::SsdTotalBytesWrittenGb,
            Normalizer::SizeGb {
                default_unit: SizeUnit::Gb,
            },
            &[r"(?im)^(?:host writes|(?P<pt>grava[çc][õo]es do host)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>TB)"],
        )];
        let table = RuleTable::compile(SourceFamily::Unknown, RULES);

        let out = table.extract("Gravações do Host : 1,536 TB\n");
        assert_eq!(out.fields.ssd_total_bytes_written_gb, Some(1573));

        let out = table.extract("Host Writes : 1,536 TB\n");
        assert_eq!(out.fields.ssd_total_bytes_written_gb, Some(1_572_864));
    }

    #[test]
    fn test_combining_picks() {
        static RULES: &[FieldRule] = &[
            FieldRule::combine(
                Field::CpuTempMaxC,
                Normalizer::TemperatureC,
                Pick::Max,
                &[r"(?m)^Core \d+{sep}(?P<value>\d+) (?P<unit>C)"],
            ),
            FieldRule::combine(
                Field::RamTotalGb,
                Normalizer::SizeGb {
                    default_unit: SizeUnit::Mb,
                },
                Pick::Sum,
                &[r"(?m)^Module size{sep}(?P<value>\d+)"],
            ),
            FieldRule::combine(
                Field::RamSlots,
                Normalizer::Number,
                Pick::Count,
                &[r"(?m)^DIMM(?P<value>\d+):"],
            ),
        ];
        let table = RuleTable::compile(SourceFamily::Unknown, RULES);
        let content = "Core 0: 61 C\nCore 1: 74 C\nModule size: 8192\nModule size: 8192\nDIMM1: x\nDIMM3: y\nDIMM1: x\n";

        let out = table.extract(content);
        assert_eq!(out.fields.cpu_temp_max_c, Some(74));
        assert_eq!(out.fields.ram_total_gb, Some(16));
        assert_eq!(out.fields.ram_slots, Some(2));
    }
}

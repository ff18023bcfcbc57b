//! Merge resolution - pattern values take precedence.

use crate::types::fields::{ExtractedFields, Field};
use crate::types::reading::SourceFamily;

/// Result of merging pattern and fallback output.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub fields: ExtractedFields,
    pub family: SourceFamily,

    /// Fields that came from the fallback stage
    pub from_fallback: Vec<Field>,
}

/// Fill fields the pattern stage left absent with fallback values.
///
/// The fallback's family replaces the sniffed one only when the sniff
/// was inconclusive.
pub fn merge(
    sniffed: SourceFamily,
    pattern: &ExtractedFields,
    fallback: &ExtractedFields,
    fallback_family: Option<SourceFamily>,
) -> Merged {
    let mut fields = pattern.clone();
    let from_fallback = fields.fill_missing_from(fallback);

    let family = match (sniffed, fallback_family) {
        (SourceFamily::Unknown, Some(reclassified)) => reclassified,
        (sniffed, _) => sniffed,
    };

    Merged {
        fields,
        family,
        from_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_value_wins() {
        let pattern = ExtractedFields {
            cpu_model: Some("Intel Core i5-8250U".into()),
            ..Default::default()
        };
        let fallback = ExtractedFields {
            cpu_model: Some("Core i5".into()),
            ram_total_gb: Some(8),
            ..Default::default()
        };

        let merged = merge(SourceFamily::SensorReport, &pattern, &fallback, None);
        assert_eq!(merged.fields.cpu_model.as_deref(), Some("Intel Core i5-8250U"));
        assert_eq!(merged.fields.ram_total_gb, Some(8));
        assert_eq!(merged.from_fallback, vec![Field::RamTotalGb]);
    }

    #[test]
    fn test_family_override_only_for_unknown() {
        let empty = ExtractedFields::new();

        let merged = merge(
            SourceFamily::Unknown,
            &empty,
            &empty,
            Some(SourceFamily::DiskHealth),
        );
        assert_eq!(merged.family, SourceFamily::DiskHealth);

        let merged = merge(
            SourceFamily::SensorReport,
            &empty,
            &empty,
            Some(SourceFamily::DiskHealth),
        );
        assert_eq!(merged.family, SourceFamily::SensorReport);
    }
}

//! Completeness gate - did pattern extraction find the essentials?

use crate::types::fields::{ExtractedFields, Field};
use crate::types::reading::SourceFamily;

/// Fields every family must produce.
pub const ESSENTIAL: &[Field] = &[Field::CpuModel, Field::RamTotalGb];

/// For sensor reports, at least one of these is also required.
pub const SENSOR_MEMORY_DETAIL: &[Field] = &[Field::RamSpeedMhz, Field::RamSlots];

/// Essential fields still missing for `family`.
///
/// The memory-detail requirement is reported as its first field when
/// none of the alternatives is present.
pub fn missing_essentials(family: SourceFamily, fields: &ExtractedFields) -> Vec<Field> {
    let mut missing: Vec<Field> = ESSENTIAL
        .iter()
        .copied()
        .filter(|f| !fields.has(*f))
        .collect();

    if family == SourceFamily::SensorReport
        && !SENSOR_MEMORY_DETAIL.iter().any(|f| fields.has(*f))
    {
        missing.push(SENSOR_MEMORY_DETAIL[0]);
    }

    missing
}

/// True when the fallback stage can be skipped.
pub fn is_complete(family: SourceFamily, fields: &ExtractedFields) -> bool {
    missing_essentials(family, fields).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn essentials() -> ExtractedFields {
        ExtractedFields {
            cpu_model: Some("Intel Core i5-8250U".into()),
            ram_total_gb: Some(8),
            ..Default::default()
        }
    }

    #[test]
    fn test_cpu_and_ram_pass_non_sensor_families() {
        assert!(is_complete(SourceFamily::DiskHealth, &essentials()));
        assert!(is_complete(SourceFamily::MonitorReport, &essentials()));
        assert!(is_complete(SourceFamily::Unknown, &essentials()));
    }

    #[test]
    fn test_sensor_reports_need_memory_detail() {
        let mut fields = essentials();
        assert!(!is_complete(SourceFamily::SensorReport, &fields));
        assert_eq!(
            missing_essentials(SourceFamily::SensorReport, &fields),
            vec![Field::RamSpeedMhz]
        );

        fields.ram_slots = Some(2);
        assert!(is_complete(SourceFamily::SensorReport, &fields));
    }

    #[test]
    fn test_disk_health_alone_fails_gate() {
        let fields = ExtractedFields {
            ssd_health_percent: Some(96),
            ..Default::default()
        };
        assert_eq!(
            missing_essentials(SourceFamily::DiskHealth, &fields),
            vec![Field::CpuModel, Field::RamTotalGb]
        );
    }
}

//! Format sniffing - classify content into a source family.
//!
//! Signatures are checked in priority order: tool banners first (they
//! name the producer outright), then generic labels that several tools
//! share. The first hit wins.

use std::path::Path;

use crate::types::reading::SourceFamily;

/// A case-insensitive substring that identifies a family.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub needle: &'static str,
    pub family: SourceFamily,
}

const fn sig(needle: &'static str, family: SourceFamily) -> Signature {
    Signature { needle, family }
}

/// Signatures in priority order. Needles are lowercase.
pub static SIGNATURES: &[Signature] = &[
    // Tool banners
    sig("cpuid hwmonitor", SourceFamily::MonitorReport),
    sig("hwmonitor", SourceFamily::MonitorReport),
    sig("crystaldiskinfo", SourceFamily::DiskHealth),
    sig("smartctl", SourceFamily::DiskHealth),
    sig("start of smart data", SourceFamily::DiskHealth),
    sig("aida64", SourceFamily::SensorReport),
    sig("hwinfo", SourceFamily::SensorReport),
    sig("everest", SourceFamily::SensorReport),
    // Generic labels
    sig("health status", SourceFamily::DiskHealth),
    sig("estado de saúde", SourceFamily::DiskHealth),
    sig("s.m.a.r.t.", SourceFamily::DiskHealth),
    sig("host writes", SourceFamily::DiskHealth),
    sig("gravações do host", SourceFamily::DiskHealth),
    sig("[ sensor ]", SourceFamily::SensorReport),
    sig("sensor properties", SourceFamily::SensorReport),
    sig("propriedades do sensor", SourceFamily::SensorReport),
    sig("[ sensores ]", SourceFamily::SensorReport),
    sig("hardware monitor", SourceFamily::MonitorReport),
    sig("mainboard model", SourceFamily::MonitorReport),
];

/// Classify content by signature scan alone.
pub fn sniff(content: &str) -> SourceFamily {
    let haystack = content.to_lowercase();
    SIGNATURES
        .iter()
        .find(|s| haystack.contains(s.needle))
        .map(|s| s.family)
        .unwrap_or(SourceFamily::Unknown)
}

/// Family hinted by the file extension, if any.
pub fn hint_from_file_name(file_name: &str) -> Option<SourceFamily> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        // HWMonitor exports its saved values as CSV
        "csv" => Some(SourceFamily::MonitorReport),
        _ => None,
    }
}

/// Classify content, consulting the file name when the scan is inconclusive.
pub fn classify(file_name: &str, content: &str) -> SourceFamily {
    match sniff(content) {
        SourceFamily::Unknown => hint_from_file_name(file_name).unwrap_or(SourceFamily::Unknown),
        family => family,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_banners() {
        assert_eq!(sniff("CrystalDiskInfo 9.1.1"), SourceFamily::DiskHealth);
        assert_eq!(sniff("smartctl 7.3 2022-02-28"), SourceFamily::DiskHealth);
        assert_eq!(sniff("AIDA64 Extreme"), SourceFamily::SensorReport);
        assert_eq!(sniff("HWiNFO64 v7.60"), SourceFamily::SensorReport);
        assert_eq!(sniff("CPUID HWMonitor Report"), SourceFamily::MonitorReport);
    }

    #[test]
    fn test_specific_before_generic() {
        // AIDA64 dumps contain disk health labels too
        let content = "AIDA64 Extreme\n  Health Status    Good\n";
        assert_eq!(sniff(content), SourceFamily::SensorReport);

        // HWMonitor lists a "Hardware monitor" per chip, but so could others
        let content = "Host Writes : 10 GB\nHardware monitor\tITE IT8686E\n";
        assert_eq!(sniff(content), SourceFamily::DiskHealth);
    }

    #[test]
    fn test_generic_labels() {
        assert_eq!(sniff("Estado de Saúde : Bom (87 %)"), SourceFamily::DiskHealth);
        assert_eq!(sniff("--------[ Sensor ]-------"), SourceFamily::SensorReport);
        assert_eq!(sniff("Mainboard Model\tPRIME"), SourceFamily::MonitorReport);
        assert_eq!(sniff("meeting notes"), SourceFamily::Unknown);
    }

    #[test]
    fn test_file_name_hint_only_when_unknown() {
        assert_eq!(classify("export.CSV", "Package,58,41,79"), SourceFamily::MonitorReport);
        assert_eq!(classify("export.csv", "CrystalDiskInfo"), SourceFamily::DiskHealth);
        assert_eq!(classify("notes.txt", "meeting notes"), SourceFamily::Unknown);
        assert_eq!(classify("no_extension", "meeting notes"), SourceFamily::Unknown);
    }
}

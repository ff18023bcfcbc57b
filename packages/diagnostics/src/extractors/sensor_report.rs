//! Rules for system sensor reports (AIDA64, HWiNFO).
//!
//! AIDA64 pads labels and values into columns with runs of spaces;
//! HWiNFO summaries use `Label: value`. Both ship English and Portuguese
//! UIs.

use super::{FieldRule, Normalizer, Pick, SizeUnit};
use crate::types::fields::Field;

pub static RULES: &[FieldRule] = &[
    FieldRule::first(
        Field::CpuModel,
        Normalizer::Text,
        &[
            // "CPU Type    QuadCore Intel Core i5-8250U, 3400 MHz (34 x 100)"
            r"(?im)^[ \t]*(?:cpu type|tipo de cpu|tipo da cpu){sep}(?:(?:mono|dual|triple|quad|hexa|octa|deca|dodeca|\d+-)core[ \t]+)?(?P<value>[^,\r\n]+)",
            r"(?im)^[ \t]*(?:cpu brand name|processor name|nome do processador|processador){sep}(?P<value>[^\r\n]+)",
        ],
    ),
    FieldRule::first(
        Field::MotherboardModel,
        Normalizer::Text,
        &[
            r"(?im)^[ \t]*(?:motherboard name|motherboard model|nome da placa-m[ãa]e|modelo da placa-m[ãa]e|placa-m[ãa]e){sep}(?P<value>[^\r\n]+)",
        ],
    ),
    FieldRule::first(
        Field::GpuModel,
        Normalizer::Text,
        &[
            // "Video Adapter    Intel(R) UHD Graphics 620  (1 GB)"
            r"(?im)^[ \t]*(?:video adapter|adaptador de v[íi]deo|placa de v[íi]deo|graphics processor|gpu name|nome da gpu){sep}(?P<value>[^\r\n]+?)(?:[ \t]{2,}\([^\r\n]*)?[ \t\r]*$",
        ],
    ),
    FieldRule::first(
        Field::RamTotalGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Mb,
        },
        &[
            r"(?im)^[ \t]*(?:system memory|total memory size|installed memory|(?P<pt>mem[óo]ria do sistema|tamanho total da mem[óo]ria|mem[óo]ria instalada)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]i?B(?:ytes)?)\b",
        ],
    ),
    FieldRule::first(
        Field::RamSpeedMhz,
        Normalizer::FrequencyMhz,
        &[
            r"(?im)^[ \t]*(?:memory speed|memory clock|(?P<pt>velocidade da mem[óo]ria|frequ[êe]ncia da mem[óo]ria|clock da mem[óo]ria)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[MG]Hz)",
            // Module rating in the DIMM line: "DDR4-2400"
            r"(?i)\bDDR\d[A-Z]?-(?P<value>\d{3,4})\b",
        ],
    ),
    FieldRule::first(
        Field::RamSlots,
        Normalizer::Number,
        &[
            r"(?im)^[ \t]*(?:total memory slots|memory slots|slots de mem[óo]ria|n[úu]mero de slots(?: de mem[óo]ria)?){sep}(?P<value>\d{1,2})\b",
        ],
    ),
    // Populated module entries, when no slot total is reported
    FieldRule::combine(
        Field::RamSlots,
        Normalizer::Number,
        Pick::Count,
        &[r"(?im)^[ \t]*DIMM[ \t]*#?[ \t]*(?P<value>\d+)[ \t]*:"],
    ),
    FieldRule::first(
        Field::SsdHealthPercent,
        Normalizer::Percent,
        &[
            r"(?im)^[ \t]*(?:drive remaining life|remaining life|vida (?:[úu]til )?restante){sep}(?P<value>\d{1,3})[ \t]*%",
            r"(?im)^[ \t]*(?:drive health|device health|health status|estado de sa[úu]de|sa[úu]de do disco){sep}[^\r\n%]*?(?P<value>\d{1,3})[ \t]*%",
        ],
    ),
    FieldRule::first(
        Field::SsdTotalGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Gb,
        },
        &[
            // "Disk Drive    SAMSUNG MZVLB256HAHQ-000H1  (238 GB, PCI-E 3.0 x4)"
            r"(?im)^[ \t]*(?:disk drive|(?P<pt>unidade de disco)){sep}[^\r\n]*?\([ \t]*(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]B)",
            r"(?im)^[ \t]*(?:drive capacity|(?P<pt>capacidade da unidade)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]i?B(?:ytes)?)\b",
        ],
    ),
    FieldRule::first(
        Field::SsdTotalBytesWrittenGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Gb,
        },
        &[
            r"(?im)^[ \t]*(?:total host writes|host writes|(?P<pt>grava[çc][õo]es (?:do|no) host|total de grava[çc][õo]es)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]i?B(?:ytes)?)\b",
        ],
    ),
    FieldRule::combine(
        Field::CpuTempMaxC,
        Normalizer::TemperatureC,
        Pick::Max,
        &[
            // "CPU Package: 45 °C (Max: 78 °C)"
            r"(?im)^[ \t]*(?:cpu package|cpu \(tctl/tdie\)|(?P<pt>pacote da cpu))[^\r\n]*?\((?:max(?:imum)?|m[áa]x(?:imo)?)[ \t]*:?[ \t]*(?P<value>\d{1,3}(?:[.,]\d+)?)[ \t]*°?[ \t]*(?P<unit>[CF])\b",
            // "CPU Package    52 °C  (126 °F)", "CPU #1 / Core #1    49 °C"
            r"(?im)^[ \t]*(?:cpu package|cpu|cpu #\d+(?:[ \t]*/[ \t]*core #\d+)?|cpu core #?\d+|cpu diode|(?P<pt>pacote da cpu|n[úu]cleo da cpu #?\d*|diodo da cpu)){sep}(?P<value>-?\d{1,3}(?:[.,]\d+)?)[ \t]*°?[ \t]*(?P<unit>[CF])\b",
        ],
    ),
    FieldRule::first(
        Field::BatteryWearPercent,
        Normalizer::Percent,
        &[
            r"(?im)^[ \t]*(?:wear level|battery wear(?: level)?|(?P<pt>n[íi]vel de desgaste|desgaste da bateria)){sep}(?P<value>\d{1,3}(?:[.,]\d+)?)[ \t]*%",
        ],
    ),
    FieldRule::first(
        Field::BatteryCycles,
        Normalizer::Number,
        &[
            r"(?im)^[ \t]*(?:cycle count|charge cycles|battery cycles|contagem de ciclos|ciclos de carga){sep}(?P<value>\d[\d.,]*)",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use crate::extractors::extract;
    use crate::types::reading::SourceFamily;

    const AIDA_EN: &str = "\
AIDA64 Extreme
Version                                           AIDA64 v6.88.6400

--------[ Summary ]-------------------------------------------------------------

    Motherboard:
      CPU Type                                          QuadCore Intel Core i5-8250U, 3400 MHz (34 x 100)
      Motherboard Name                                  Dell Inspiron 5570
      System Memory                                     8072 MB  (DDR4 SDRAM)
      DIMM1: Samsung M471A1K43CB1-CRC                   8 GB DDR4-2400 DDR4 SDRAM  (17-17-17-39 @ 1200 MHz)

    Display:
      Video Adapter                                     Intel(R) UHD Graphics 620  (1 GB)

    Storage:
      Disk Drive                                        SAMSUNG MZVLB256HAHQ-000H1  (238 GB, PCI-E 3.0 x4)

--------[ Sensor ]--------------------------------------------------------------

    Temperatures:
      CPU Package                                       52 °C  (126 °F)
      CPU IA Cores                                      51 °C  (124 °F)
      CPU #1 / Core #1                                  49 °C  (120 °F)
      CPU #1 / Core #2                                  57 °C  (135 °F)
      GPU Diode                                         61 °C  (142 °F)

    Cooling Fans:
      CPU                                               2150 RPM

--------[ Power Management ]----------------------------------------------------

    Battery Properties:
      Wear Level                                        12 %
";

    const AIDA_PT: &str = "\
AIDA64 Extreme
--------[ Resumo ]--------------------------------------------------------------
    Placa-mãe:
      Tipo de CPU                                       DualCore Intel Core i3-7020U, 2300 MHz (23 x 100)
      Nome da placa-mãe                                 Acer Aspire A515-51
      Memória do sistema                                4 GB  (DDR4 SDRAM)
      DIMM1: Kingston 99U5663-002.A00G                  4 GB DDR4-2133 DDR4 SDRAM
      Adaptador de vídeo                                Intel(R) HD Graphics 620  (1 GB)
--------[ Sensor ]--------------------------------------------------------------
      Pacote da CPU                                     61 °C
      Nível de desgaste                                 21,5 %
      Ciclos de carga                                   312
";

    const HWINFO: &str = "\
HWiNFO64 v7.60
CPU Brand Name: Intel Core i7-8700K
Motherboard Model: ASUS PRIME Z370-A
Total Memory Size: 16 GBytes
Memory Speed: 1333.3 MHz
Memory Slots: 4
CPU Package: 45 °C (Max: 78 °C)
Drive Remaining Life: 93 %
Total Host Writes: 1,5 TB
";

    #[test]
    fn test_aida_english_summary() {
        let out = extract(SourceFamily::SensorReport, AIDA_EN);
        let f = &out.fields;
        assert_eq!(f.cpu_model.as_deref(), Some("Intel Core i5-8250U"));
        assert_eq!(f.motherboard_model.as_deref(), Some("Dell Inspiron 5570"));
        assert_eq!(f.gpu_model.as_deref(), Some("Intel(R) UHD Graphics 620"));
        assert_eq!(f.ram_total_gb, Some(8));
        assert_eq!(f.ram_speed_mhz, Some(2400));
        assert_eq!(f.ram_slots, Some(1));
        assert_eq!(f.ssd_total_gb, Some(238));
        assert_eq!(f.cpu_temp_max_c, Some(57));
        assert_eq!(f.battery_wear_percent, Some(12.0));
    }

    #[test]
    fn test_aida_portuguese_summary() {
        let out = extract(SourceFamily::SensorReport, AIDA_PT);
        let f = &out.fields;
        assert_eq!(f.cpu_model.as_deref(), Some("Intel Core i3-7020U"));
        assert_eq!(f.motherboard_model.as_deref(), Some("Acer Aspire A515-51"));
        assert_eq!(f.gpu_model.as_deref(), Some("Intel(R) HD Graphics 620"));
        assert_eq!(f.ram_total_gb, Some(4));
        assert_eq!(f.ram_speed_mhz, Some(2133));
        assert_eq!(f.cpu_temp_max_c, Some(61));
        assert_eq!(f.battery_wear_percent, Some(21.5));
        assert_eq!(f.battery_cycles, Some(312));
    }

    #[test]
    fn test_hwinfo_summary() {
        let out = extract(SourceFamily::SensorReport, HWINFO);
        let f = &out.fields;
        assert_eq!(f.cpu_model.as_deref(), Some("Intel Core i7-8700K"));
        assert_eq!(f.motherboard_model.as_deref(), Some("ASUS PRIME Z370-A"));
        assert_eq!(f.ram_total_gb, Some(16));
        assert_eq!(f.ram_speed_mhz, Some(1333));
        assert_eq!(f.ram_slots, Some(4));
        assert_eq!(f.cpu_temp_max_c, Some(78));
        assert_eq!(f.ssd_health_percent, Some(93));
        assert_eq!(f.ssd_total_bytes_written_gb, Some(1536));
    }
}

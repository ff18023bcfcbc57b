//! Rules for hardware monitor reports (CPUID HWMonitor).
//!
//! HWMonitor reports are tab separated and grouped per device: a device
//! line (`Processor 0`, `Display adapter 0`, `DIMM # 1`) followed by
//! indented properties. Saved monitoring data lists value, min and max
//! per sensor.

use super::{FieldRule, Normalizer, Pick, SizeUnit};
use crate::types::fields::Field;

pub static RULES: &[FieldRule] = &[
    FieldRule::first(
        Field::CpuModel,
        Normalizer::Text,
        &[
            r"(?im)^(?:processor|processador)[ \t]+\d+[^\r\n]*\r?\n(?:[^\r\n]*\r?\n){0,8}?[ \t]*(?:name|nome){sep}(?P<value>[^\r\n]+)",
            r"(?im)^[ \t]*(?:specification|especifica[çc][ãa]o){sep}(?P<value>[^\r\n]+)",
        ],
    ),
    FieldRule::first(
        Field::MotherboardModel,
        Normalizer::Text,
        &[
            // "Mainboard Model	PRIME B450M-A (0x00000229 - 0x008ADC84)"
            r"(?im)^[ \t]*(?:mainboard model|motherboard model|modelo da placa-m[ãa]e){sep}(?P<value>[^\r\n(]+)",
        ],
    ),
    FieldRule::first(
        Field::GpuModel,
        Normalizer::Text,
        &[
            r"(?im)^(?:display adapter|adaptador de v[íi]deo)[ \t]+\d+[^\r\n]*\r?\n(?:[^\r\n]*\r?\n){0,8}?[ \t]*(?:name|nome){sep}(?P<value>[^\r\n]+)",
        ],
    ),
    FieldRule::first(
        Field::RamTotalGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Mb,
        },
        &[
            r"(?im)^[ \t]*(?:memory size|total memory|(?P<pt>tamanho da mem[óo]ria|mem[óo]ria total)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]i?B(?:ytes)?)\b",
        ],
    ),
    // Sum of the SPD module sizes
    FieldRule::combine(
        Field::RamTotalGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Mb,
        },
        Pick::Sum,
        &[r"(?im)^[ \t]*(?:size|(?P<pt>tamanho)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[MG]i?B(?:ytes)?)\b"],
    ),
    FieldRule::first(
        Field::RamSpeedMhz,
        Normalizer::FrequencyMhz,
        &[
            // "Max bandwidth	DDR4-3200 (1600 MHz)"
            r"(?im)^[ \t]*(?:max bandwidth|largura de banda m[áa]xima){sep}DDR\d[A-Z]?-(?P<value>\d{3,4})",
            r"(?im)^[ \t]*(?:memory frequency|(?P<pt>frequ[êe]ncia da mem[óo]ria)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[MG]Hz)",
        ],
    ),
    FieldRule::first(
        Field::RamSlots,
        Normalizer::Number,
        &[r"(?im)^[ \t]*(?:memory slots|number of slots|slots de mem[óo]ria){sep}(?P<value>\d{1,2})\b"],
    ),
    FieldRule::combine(
        Field::RamSlots,
        Normalizer::Number,
        Pick::Count,
        &[r"(?im)^DIMM[ \t]*#[ \t]*(?P<value>\d+)"],
    ),
    FieldRule::first(
        Field::SsdHealthPercent,
        Normalizer::Percent,
        &[r"(?im)^[ \t]*(?:health status|health|sa[úu]de){sep}(?P<value>\d{1,3})[ \t]*%"],
    ),
    FieldRule::first(
        Field::SsdTotalGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Gb,
        },
        &[r"(?im)^[ \t]*(?:capacity|(?P<pt>capacidade)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]i?B(?:ytes)?)\b"],
    ),
    FieldRule::first(
        Field::SsdTotalBytesWrittenGb,
        Normalizer::SizeGb {
            default_unit: SizeUnit::Gb,
        },
        &[
            r"(?im)^[ \t]*(?:total host writes|host writes|(?P<pt>grava[çc][õo]es do host)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGT]i?B(?:ytes)?)\b",
        ],
    ),
    FieldRule::combine(
        Field::CpuTempMaxC,
        Normalizer::TemperatureC,
        Pick::Max,
        &[
            // Saved monitoring data: "Package	58 °C	41 °C	79 °C" (value, min, max)
            r"(?im)^[ \t]*(?:package|cpu|core #?\d+|tctl/tdie|(?P<pt>pacote))\t+[ \t]*-?\d{1,3}(?:[.,]\d+)?[ \t]*°?[ \t]*C\t+[ \t]*-?\d{1,3}(?:[.,]\d+)?[ \t]*°?[ \t]*C\t+[ \t]*(?P<value>\d{1,3}(?:[.,]\d+)?)[ \t]*°?[ \t]*(?P<unit>C)\b",
            // Report: "Temperature 0	58 degC (136 degF) [0x3A] (Package)"
            r"(?im)^[ \t]*(?:temperature|(?P<pt>temperatura))[ \t]+\d+\t+[ \t]*(?P<value>\d{1,3}(?:[.,]\d+)?)[ \t]*(?:deg|°)?(?P<unit>[CF])\b[^\r\n]*\((?:package|pacote|cpu[^)]*|core[^)]*|ccd[^)]*|tctl[^)]*|tdie[^)]*)\)",
        ],
    ),
    FieldRule::first(
        Field::BatteryWearPercent,
        Normalizer::Percent,
        &[r"(?im)^[ \t]*(?:wear level|(?P<pt>n[íi]vel de desgaste)){sep}(?P<value>\d{1,3}(?:[.,]\d+)?)[ \t]*%"],
    ),
    FieldRule::first(
        Field::BatteryCycles,
        Normalizer::Number,
        &[r"(?im)^[ \t]*(?:cycle count|charge cycles|contagem de ciclos|ciclos de carga){sep}(?P<value>\d[\d.,]*)"],
    ),
];

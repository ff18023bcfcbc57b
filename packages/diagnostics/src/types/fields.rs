//! Extracted hardware attributes.
//!
//! `ExtractedFields` is a partial record: every attribute is optional and
//! stages fill in what they can. `Field` names each attribute so rule
//! tables, the fallback contract and the SQL stores can address them
//! generically.

use serde::{Deserialize, Serialize};

/// One extractable hardware attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CpuModel,
    MotherboardModel,
    GpuModel,
    RamTotalGb,
    RamSpeedMhz,
    RamSlots,
    SsdHealthPercent,
    SsdTotalGb,
    SsdTotalBytesWrittenGb,
    CpuTempMaxC,
    BatteryWearPercent,
    BatteryCycles,
}

/// Value shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Rounded to the nearest integer on normalization
    Integer,
    /// Kept fractional
    Fractional,
}

impl Field {
    /// Every field, in storage column order.
    pub const ALL: [Field; 12] = [
        Field::CpuModel,
        Field::MotherboardModel,
        Field::GpuModel,
        Field::RamTotalGb,
        Field::RamSpeedMhz,
        Field::RamSlots,
        Field::SsdHealthPercent,
        Field::SsdTotalGb,
        Field::SsdTotalBytesWrittenGb,
        Field::CpuTempMaxC,
        Field::BatteryWearPercent,
        Field::BatteryCycles,
    ];

    /// Snake-case name used by the fallback contract and the SQL columns.
    pub fn name(self) -> &'static str {
        match self {
            Field::CpuModel => "cpu_model",
            Field::MotherboardModel => "motherboard_model",
            Field::GpuModel => "gpu_model",
            Field::RamTotalGb => "ram_total_gb",
            Field::RamSpeedMhz => "ram_speed_mhz",
            Field::RamSlots => "ram_slots",
            Field::SsdHealthPercent => "ssd_health_percent",
            Field::SsdTotalGb => "ssd_total_gb",
            Field::SsdTotalBytesWrittenGb => "ssd_total_bytes_written_gb",
            Field::CpuTempMaxC => "cpu_temp_max_c",
            Field::BatteryWearPercent => "battery_wear_percent",
            Field::BatteryCycles => "battery_cycles",
        }
    }

    /// Look a field up by its snake-case name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::CpuModel | Field::MotherboardModel | Field::GpuModel => FieldKind::Text,
            Field::BatteryWearPercent => FieldKind::Fractional,
            _ => FieldKind::Integer,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Fractional(f64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Fractional(n) => write!(f, "{n}"),
        }
    }
}

/// Partial record of extracted attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motherboard_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_total_gb: Option<i64>,

    #[serde(default, rename = "ramSpeedMHz", skip_serializing_if = "Option::is_none")]
    pub ram_speed_mhz: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_slots: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssd_health_percent: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssd_total_gb: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssd_total_bytes_written_gb: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_temp_max_c: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_wear_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_cycles: Option<i64>,
}

impl ExtractedFields {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field as a tagged value.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        let text = |v: &Option<String>| v.clone().map(FieldValue::Text);
        let int = |v: Option<i64>| v.map(FieldValue::Integer);

        match field {
            Field::CpuModel => text(&self.cpu_model),
            Field::MotherboardModel => text(&self.motherboard_model),
            Field::GpuModel => text(&self.gpu_model),
            Field::RamTotalGb => int(self.ram_total_gb),
            Field::RamSpeedMhz => int(self.ram_speed_mhz),
            Field::RamSlots => int(self.ram_slots),
            Field::SsdHealthPercent => int(self.ssd_health_percent),
            Field::SsdTotalGb => int(self.ssd_total_gb),
            Field::SsdTotalBytesWrittenGb => int(self.ssd_total_bytes_written_gb),
            Field::CpuTempMaxC => int(self.cpu_temp_max_c),
            Field::BatteryWearPercent => self.battery_wear_percent.map(FieldValue::Fractional),
            Field::BatteryCycles => int(self.battery_cycles),
        }
    }

    /// Set a field, coercing numeric values to the field's kind.
    ///
    /// Returns false (and leaves the record untouched) when the value
    /// cannot represent the field, e.g. text for a numeric field.
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        let as_int = |v: &FieldValue| match v {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Fractional(f) if f.is_finite() => Some(f.round() as i64),
            _ => None,
        };

        match field.kind() {
            FieldKind::Text => {
                let FieldValue::Text(s) = value else {
                    return false;
                };
                let slot = match field {
                    Field::CpuModel => &mut self.cpu_model,
                    Field::MotherboardModel => &mut self.motherboard_model,
                    _ => &mut self.gpu_model,
                };
                *slot = Some(s);
            }
            FieldKind::Fractional => {
                let v = match value {
                    FieldValue::Fractional(f) if f.is_finite() => f,
                    FieldValue::Integer(i) => i as f64,
                    _ => return false,
                };
                self.battery_wear_percent = Some(v);
            }
            FieldKind::Integer => {
                let Some(v) = as_int(&value) else {
                    return false;
                };
                let slot = match field {
                    Field::RamTotalGb => &mut self.ram_total_gb,
                    Field::RamSpeedMhz => &mut self.ram_speed_mhz,
                    Field::RamSlots => &mut self.ram_slots,
                    Field::SsdHealthPercent => &mut self.ssd_health_percent,
                    Field::SsdTotalGb => &mut self.ssd_total_gb,
                    Field::SsdTotalBytesWrittenGb => &mut self.ssd_total_bytes_written_gb,
                    Field::CpuTempMaxC => &mut self.cpu_temp_max_c,
                    _ => &mut self.battery_cycles,
                };
                *slot = Some(v);
            }
        }
        true
    }

    /// Whether a field is present.
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Fields that are present, in column order.
    pub fn present(&self) -> Vec<Field> {
        Field::ALL.into_iter().filter(|f| self.has(*f)).collect()
    }

    /// Number of present fields.
    pub fn count(&self) -> usize {
        self.present().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Fill absent fields from `other`, never overwriting present ones.
    ///
    /// Returns the fields that were filled.
    pub fn fill_missing_from(&mut self, other: &ExtractedFields) -> Vec<Field> {
        let mut filled = Vec::new();
        for field in Field::ALL {
            if self.has(field) {
                continue;
            }
            if let Some(value) = other.get(field) {
                if self.set(field, value) {
                    filled.push(field);
                }
            }
        }
        filled
    }
}

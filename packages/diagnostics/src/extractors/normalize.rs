//! Unit normalization for extracted values.
//!
//! Numbers arrive with decimal commas or points, thousands grouping and
//! a zoo of unit spellings (`MB`, `MBytes`, `GiB`, `degC`, `GHz`). Every
//! normalizer maps its input into one canonical unit; rounding happens
//! once, when the value is stored into its field.

/// How a captured value is turned into a canonical number or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    /// Free text: whitespace collapsed, trailing separators trimmed
    Text,
    /// Plain number
    Number,
    /// Percentage, rejected outside 0-100
    Percent,
    /// Data size in gigabytes; the default unit applies when none was captured
    SizeGb { default_unit: SizeUnit },
    /// Temperature in Celsius; Fahrenheit converted
    TemperatureC,
    /// Frequency in MHz; GHz converted
    FrequencyMhz,
}

/// Which character a lone comma stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalMark {
    /// Guess from the digits: `2,048` is grouping, `1,5` is decimal
    #[default]
    Auto,
    /// The value came from a Portuguese label; a lone comma is always decimal
    Comma,
}

/// Data size unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Kb,
    Mb,
    Gb,
    Tb,
    Pb,
}

impl SizeUnit {
    /// Parse `KB`, `MiB`, `GBytes`, `TB` and friends.
    pub fn parse(raw: &str) -> Option<Self> {
        let unit = raw.trim().to_lowercase();
        let unit = unit.trim_end_matches("ytes").trim_end_matches("yte");
        match unit {
            "kb" | "kib" | "k" => Some(Self::Kb),
            "mb" | "mib" | "m" => Some(Self::Mb),
            "gb" | "gib" | "g" => Some(Self::Gb),
            "tb" | "tib" | "t" => Some(Self::Tb),
            "pb" | "pib" | "p" => Some(Self::Pb),
            _ => None,
        }
    }

    /// Multiplier into gigabytes (binary steps of 1024).
    pub fn to_gb_factor(self) -> f64 {
        match self {
            Self::Kb => 1.0 / (1024.0 * 1024.0),
            Self::Mb => 1.0 / 1024.0,
            Self::Gb => 1.0,
            Self::Tb => 1024.0,
            Self::Pb => 1024.0 * 1024.0,
        }
    }
}

impl Normalizer {
    /// Normalize a captured number into this normalizer's canonical unit.
    pub fn to_number(self, value: &str, unit: Option<&str>) -> Option<f64> {
        self.to_number_with(value, unit, DecimalMark::Auto)
    }

    /// Like `to_number`, reading a lone comma according to `mark`.
    pub fn to_number_with(self, value: &str, unit: Option<&str>, mark: DecimalMark) -> Option<f64> {
        let n = parse_number_with(value, mark)?;
        let unit = unit.map(str::trim).filter(|u| !u.is_empty());

        match self {
            Normalizer::Text => None,
            Normalizer::Number => Some(n),
            Normalizer::Percent => (0.0..=100.0).contains(&n).then_some(n),
            Normalizer::SizeGb { default_unit } => {
                let unit = match unit {
                    Some(u) => SizeUnit::parse(u)?,
                    None => default_unit,
                };
                Some(n * unit.to_gb_factor())
            }
            Normalizer::TemperatureC => {
                let fahrenheit = unit
                    .map(|u| u.trim_start_matches('°').to_lowercase())
                    .is_some_and(|u| u == "f" || u == "degf");
                let celsius = if fahrenheit { (n - 32.0) * 5.0 / 9.0 } else { n };
                // Sensor dumps use -127/255 for disconnected sensors
                (-50.0..=150.0).contains(&celsius).then_some(celsius)
            }
            Normalizer::FrequencyMhz => {
                let ghz = unit.is_some_and(|u| u.eq_ignore_ascii_case("ghz"));
                Some(if ghz { n * 1000.0 } else { n })
            }
        }
    }

    /// Normalize captured text.
    pub fn to_text(self, value: &str) -> Option<String> {
        let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
        let cleaned = collapsed
            .trim_end_matches([',', ';', ':', '-', '|'])
            .trim()
            .to_string();
        (!cleaned.is_empty()).then_some(cleaned)
    }

    pub fn is_text(self) -> bool {
        matches!(self, Normalizer::Text)
    }
}

/// Parse a numeric literal written with either decimal convention.
///
/// `1,5` and `1.5` both parse to 1.5. A single comma followed by exactly
/// three digits (`2,048`) is thousands grouping, as are repeated
/// separators (`12.345.678`). When both separators appear the last one
/// is the decimal mark (`1.234,5`, `1,234.5`).
pub fn parse_number(raw: &str) -> Option<f64> {
    parse_number_with(raw, DecimalMark::Auto)
}

/// Parse a numeric literal, resolving a lone comma with `mark`.
///
/// Under `DecimalMark::Comma`, `1,536` is 1.536; every other shape parses
/// as in `parse_number`.
pub fn parse_number_with(raw: &str, mark: DecimalMark) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let canonical = match (commas, dots) {
        (0, 0) => cleaned,
        (0, 1) => cleaned,
        (0, _) => cleaned.replace('.', ""),
        (1, 0) => {
            let (int_part, frac) = cleaned.split_once(',').unwrap_or((cleaned.as_str(), ""));
            let grouping = mark == DecimalMark::Auto
                && frac.len() == 3
                && !int_part.is_empty()
                && int_part != "0";
            if grouping {
                format!("{int_part}{frac}")
            } else {
                format!("{int_part}.{frac}")
            }
        }
        (_, 0) => cleaned.replace(',', ""),
        _ => {
            let last_comma = cleaned.rfind(',').unwrap_or(0);
            let last_dot = cleaned.rfind('.').unwrap_or(0);
            if last_comma > last_dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
    };

    canonical.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GB: Normalizer = Normalizer::SizeGb {
        default_unit: SizeUnit::Gb,
    };

    #[test]
    fn test_parse_number_conventions() {
        assert_eq!(parse_number("96"), Some(96.0));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("1,5"), Some(1.5));
        assert_eq!(parse_number("2,048"), Some(2048.0));
        assert_eq!(parse_number("0,500"), Some(0.5));
        assert_eq!(parse_number("12.345.678"), Some(12_345_678.0));
        assert_eq!(parse_number("4,239,117"), Some(4_239_117.0));
        assert_eq!(parse_number("1.234,5"), Some(1234.5));
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn test_comma_mark_reads_three_digit_fraction() {
        assert_eq!(parse_number_with("1,536", DecimalMark::Comma), Some(1.536));
        assert_eq!(parse_number_with("1,536", DecimalMark::Auto), Some(1536.0));
        assert_eq!(parse_number_with("240,0", DecimalMark::Comma), Some(240.0));
        assert_eq!(parse_number_with("1.234,5", DecimalMark::Comma), Some(1234.5));
        assert_eq!(
            GB.to_number_with("1,536", Some("TB"), DecimalMark::Comma),
            Some(1.536 * 1024.0)
        );
    }

    #[test]
    fn test_size_units() {
        assert_eq!(GB.to_number("8192", Some("MB")), Some(8.0));
        assert_eq!(GB.to_number("8192", Some("MBytes")), Some(8.0));
        assert_eq!(GB.to_number("1", Some("TB")), Some(1024.0));
        assert_eq!(GB.to_number("1,5", Some("TiB")), Some(1536.0));
        assert_eq!(GB.to_number("500", None), Some(500.0));
        assert_eq!(GB.to_number("500", Some("parsecs")), None);

        let mb_default = Normalizer::SizeGb {
            default_unit: SizeUnit::Mb,
        };
        assert_eq!(mb_default.to_number("2048", None), Some(2.0));
    }

    #[test]
    fn test_temperature_and_frequency() {
        let t = Normalizer::TemperatureC;
        assert_eq!(t.to_number("52", Some("C")), Some(52.0));
        assert_eq!(t.to_number("212", Some("°F")), Some(100.0));
        assert_eq!(t.to_number("255", Some("C")), None);

        let f = Normalizer::FrequencyMhz;
        assert_eq!(f.to_number("3,2", Some("GHz")), Some(3200.0));
        assert_eq!(f.to_number("2400", Some("MHz")), Some(2400.0));
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(Normalizer::Percent.to_number("96", None), Some(96.0));
        assert_eq!(Normalizer::Percent.to_number("12,5", None), Some(12.5));
        assert_eq!(Normalizer::Percent.to_number("140", None), None);
    }

    #[test]
    fn test_text_cleanup() {
        assert_eq!(
            Normalizer::Text.to_text("  Intel   Core i5-8250U ,"),
            Some("Intel Core i5-8250U".to_string())
        );
        assert_eq!(Normalizer::Text.to_text("  - "), None);
    }

    proptest! {
        #[test]
        fn prop_terabytes_match_gigabytes(tb in 1u32..64) {
            let from_tb = GB.to_number(&tb.to_string(), Some("TB")).unwrap();
            let from_gb = GB.to_number(&(tb * 1024).to_string(), Some("GB")).unwrap();
            prop_assert_eq!(from_tb.round(), from_gb.round());
        }

        #[test]
        fn prop_decimal_comma_equals_point(int in 0u32..10_000, frac in 1u32..10) {
            let comma = parse_number(&format!("{int},{frac}"));
            let point = parse_number(&format!("{int}.{frac}"));
            prop_assert_eq!(comma, point);
        }
    }
}

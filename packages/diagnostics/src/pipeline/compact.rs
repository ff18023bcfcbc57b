//! Log compaction - drop bulky sections before a log is stored.
//!
//! Large sensor dumps spend most of their length on CPUID feature flags,
//! PCI/USB enumeration, installed software and the like. The compactor
//! walks the log line by line and switches mode on section headers:
//!
//! - **preamble** (start): keep up to `preamble_lines` lines
//! - **copy**: after an informative header (motherboard, memory, storage...)
//! - **skip**: after a noisy header, with one marker line in its place
//!
//! Headers it does not recognise leave the mode unchanged. If the result
//! is implausibly short for a large input (no headers were recognised),
//! it is discarded and the log is hard-truncated instead. Whatever path
//! was taken, the stored text is finally clamped to `max_stored_chars`.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::config::PipelineConfig;

/// `--------[ Sensor ]-----`, `=== START OF SMART DATA SECTION ===`, `### Memory`
static HEADER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^[ \t]*-{2,}[ \t]*\[[ \t]*(?P<title>[^\]]+?)[ \t]*\][ \t]*-*[ \t]*$",
        r"^[ \t]*={3,}[ \t]*(?P<title>[^=]+?)[ \t]*={3,}[ \t]*$",
        r"^[ \t]*#{2,3}[ \t]+(?P<title>.+?)[ \t]*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid header pattern {p:?}: {e}")))
    .collect()
});

/// Sections that are dropped. Checked before the informative list so
/// that "CPUID" or "Windows Video" are not mistaken for CPU or video.
const NOISY: &[&str] = &[
    "cpuid",
    "pci",
    "usb",
    "devices",
    "dispositivos",
    "drivers",
    "services",
    "serviços",
    "processes",
    "processos",
    "programs",
    "programas",
    "autorun",
    "inicialização automática",
    "windows",
    "environment",
    "ambiente",
    "fonts",
    "fontes",
    "dmi",
    "audio",
    "áudio",
    "network",
    "rede",
    "opengl",
    "directx",
    "vulkan",
    "security",
    "segurança",
    "licenses",
    "licenças",
    "scheduled",
    "agendadas",
    "event logs",
    "logs de eventos",
    "instructions",
    "instruções",
    "features",
    "recursos",
    "flags",
    "ports",
    "portas",
    "printers",
    "impressoras",
    "database",
    "banco de dados",
];

/// Sections that are kept.
const INFORMATIVE: &[&str] = &[
    "summary",
    "resumo",
    "computer",
    "computador",
    "motherboard",
    "placa mãe",
    "mainboard",
    "cpu",
    "processor",
    "processors",
    "processador",
    "memory",
    "memória",
    "spd",
    "chipset",
    "bios",
    "storage",
    "armazenamento",
    "disk",
    "disco",
    "ata",
    "smart",
    "information",
    "informações",
    "battery",
    "bateria",
    "power",
    "energia",
    "sensor",
    "sensores",
    "display",
    "video",
    "vídeo",
    "gpu",
];

/// How a section header was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Noisy,
    Informative,
    Unrecognized,
}

/// Which path produced the stored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionPath {
    /// Small log, stored as uploaded
    Verbatim,
    /// Noisy sections stripped
    Compacted,
    /// Compaction misfired; first lines kept
    Truncated,
}

/// Result of compacting one log.
#[derive(Debug, Clone, PartialEq)]
pub struct Compaction {
    pub content: String,
    pub path: CompactionPath,
    pub input_lines: usize,
    pub output_lines: usize,
    pub sections_omitted: usize,

    /// The length clamp cut the text
    pub clamped: bool,
}

/// Title of a section header line, if `line` is one.
pub fn section_title(line: &str) -> Option<&str> {
    HEADER_PATTERNS
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|caps| caps.name("title"))
        .map(|m| m.as_str())
}

/// Classify a section title against the keyword lists (whole words).
pub fn classify_section(title: &str) -> SectionKind {
    let words: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let padded = format!(" {} ", words.split_whitespace().collect::<Vec<_>>().join(" "));
    let has = |kw: &&str| padded.contains(&format!(" {kw} "));

    if NOISY.iter().any(has) {
        SectionKind::Noisy
    } else if INFORMATIVE.iter().any(has) {
        SectionKind::Informative
    } else {
        SectionKind::Unrecognized
    }
}

/// Marker emitted in place of a skipped section.
pub fn omitted_marker(title: &str) -> String {
    format!("[... {title} section omitted ...]")
}

/// Marker appended after a safety truncation.
pub fn truncation_marker(kept: usize, total: usize) -> String {
    format!("[... truncated: kept {kept} of {total} lines ...]")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Preamble { kept: usize },
    Copy,
    Skip,
}

/// Compact `content` for storage.
pub fn compact(content: &str, config: &PipelineConfig) -> Compaction {
    let lines: Vec<&str> = content.lines().collect();
    let input_lines = lines.len();

    if input_lines <= config.compaction_min_lines {
        let (content, clamped) = clamp_chars(content, config.max_stored_chars);
        return Compaction {
            output_lines: content.lines().count(),
            content,
            path: CompactionPath::Verbatim,
            input_lines,
            sections_omitted: 0,
            clamped,
        };
    }

    let mut out: Vec<String> = Vec::new();
    let mut mode = Mode::Preamble { kept: 0 };
    let mut sections_omitted = 0;

    for line in &lines {
        if let Some(title) = section_title(line) {
            match classify_section(title) {
                SectionKind::Noisy => {
                    out.push(omitted_marker(title));
                    mode = Mode::Skip;
                    sections_omitted += 1;
                    continue;
                }
                SectionKind::Informative => {
                    mode = Mode::Copy;
                    out.push(line.to_string());
                    continue;
                }
                SectionKind::Unrecognized => {}
            }
        }

        match mode {
            Mode::Preamble { kept } if kept < config.preamble_lines => {
                out.push(line.to_string());
                mode = Mode::Preamble { kept: kept + 1 };
            }
            Mode::Preamble { .. } | Mode::Skip => {}
            Mode::Copy => out.push(line.to_string()),
        }
    }

    let (path, body) = if out.len() < config.min_surviving_lines {
        let kept = config.truncate_to_lines.min(input_lines);
        let mut body: Vec<String> = lines[..kept].iter().map(|l| l.to_string()).collect();
        body.push(truncation_marker(kept, input_lines));
        debug!(
            input_lines,
            surviving = out.len(),
            kept,
            "Compaction misfired, truncating instead"
        );
        (CompactionPath::Truncated, body)
    } else {
        (CompactionPath::Compacted, out)
    };

    let joined = body.join("\n");
    let (content, clamped) = clamp_chars(&joined, config.max_stored_chars);

    debug!(
        input_lines,
        output_lines = body.len(),
        sections_omitted,
        path = ?path,
        "Log compacted"
    );

    Compaction {
        output_lines: content.lines().count(),
        content,
        path,
        input_lines,
        sections_omitted,
        clamped,
    }
}

/// Cut `text` to at most `max` characters, at a char boundary.
fn clamp_chars(text: &str, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (text[..idx].to_string(), true),
        None => (text.to_string(), false),
    }
}

//! Rules for disk health reporters (CrystalDiskInfo, smartctl).
//!
//! CrystalDiskInfo writes `Label : value` lines in the UI language;
//! smartctl prints raw counters with a humanized size in brackets.

use super::{FieldRule, Normalizer, SizeUnit};
use crate::types::fields::Field;

const GB: Normalizer = Normalizer::SizeGb {
    default_unit: SizeUnit::Gb,
};

pub static RULES: &[FieldRule] = &[
    FieldRule::first(
        Field::SsdHealthPercent,
        Normalizer::Percent,
        &[
            // "Health Status : Good (96 %)"
            r"(?im)^[ \t]*health status{sep}[^\r\n%]*?(?P<value>\d{1,3})[ \t]*%",
            // "Estado de Saúde : Bom (96 %)"
            r"(?im)^[ \t]*estado de sa[úu]de{sep}[^\r\n%]*?(?P<value>\d{1,3})[ \t]*%",
            r"(?im)^[ \t]*(?:device|drive) health{sep}[^\r\n%]*?(?P<value>\d{1,3})[ \t]*%",
            r"(?im)^[ \t]*sa[úu]de (?:do disco|do dispositivo|da unidade){sep}[^\r\n%]*?(?P<value>\d{1,3})[ \t]*%",
            r"(?im)^[ \t]*(?:remaining life|vida (?:útil )?restante){sep}(?P<value>\d{1,3})[ \t]*%",
            // smartctl NVMe log
            r"(?im)^[ \t]*available spare{sep}(?P<value>\d{1,3})[ \t]*%",
            r"(?im)^[ \t]*reserva disponível{sep}(?P<value>\d{1,3})[ \t]*%",
        ],
    ),
    FieldRule::first(
        Field::SsdTotalBytesWrittenGb,
        GB,
        &[
            r"(?im)^[ \t]*(?:total )?host writes{sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]i?B(?:ytes)?)\b",
            r"(?im)^[ \t]*(?P<pt>(?:grava[çc][õo]es|escritas) (?:do|no|pelo) host){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]i?B(?:ytes)?)\b",
            r"(?im)^[ \t]*(?P<pt>total de (?:grava[çc][õo]es|escritas)){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]i?B(?:ytes)?)\b",
            // "Data Units Written: 4,239,117 [2.17 TB]"
            r"(?im)^[ \t]*data units written{sep}[\d.,]+[ \t]*\[[ \t]*(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]B)[ \t]*\]",
        ],
    ),
    FieldRule::first(
        Field::SsdTotalGb,
        GB,
        &[
            // "Disk Size : 500.1 GB (8.4/137.4/500.1/500.1)"
            r"(?im)^[ \t]*disk size{sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]i?B)\b",
            r"(?im)^[ \t]*(?P<pt>tamanho do disco|capacidade do disco|capacidade){sep}(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]i?B)\b",
            // "User Capacity: 500,107,862,016 bytes [500 GB]"
            r"(?im)^[ \t]*(?:user capacity|total nvm capacity|namespace 1 size/capacity){sep}[\d.,]+[ \t]*bytes[ \t]*\[[ \t]*(?P<value>[\d.,]+)[ \t]*(?P<unit>[KMGTP]B)[ \t]*\]",
        ],
    ),
];

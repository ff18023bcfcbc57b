//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the diagnostics
//! library without calling a real extraction service.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::error::{DiagnosticsError, Result};
use crate::traits::extractor::FieldExtractor;
use crate::types::fields::ExtractedFields;
use crate::types::reading::{CaptureStage, Reading, SourceFamily};

/// A mock field extractor for testing.
///
/// Returns canned responses in order; once the queue is exhausted the
/// default response (an empty object unless configured) is repeated.
/// Clones share state, so a test can keep a handle for assertions after
/// moving the mock into a `Processor`.
#[derive(Clone, Default)]
pub struct MockFieldExtractor {
    /// Responses served before the default
    queued: Arc<RwLock<VecDeque<MockResponse>>>,

    /// Response served when the queue is empty
    default: Arc<RwLock<Option<MockResponse>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockExtractorCall>>>,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Value(serde_json::Value),
    Failure(String),
}

/// Record of a call made to the mock extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum MockExtractorCall {
    ExtractFields { excerpt: String },
}

impl MockFieldExtractor {
    /// Create a mock that answers `{}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call with `value`.
    pub fn with_response(self, value: serde_json::Value) -> Self {
        *self.default.write().unwrap() = Some(MockResponse::Value(value));
        self
    }

    /// Answer the next call with `value`, ahead of the default.
    pub fn then_respond(self, value: serde_json::Value) -> Self {
        self.queued
            .write()
            .unwrap()
            .push_back(MockResponse::Value(value));
        self
    }

    /// Fail every call, as an unreachable service would.
    pub fn failing(self) -> Self {
        *self.default.write().unwrap() =
            Some(MockResponse::Failure("connection refused".to_string()));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockExtractorCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Excerpts received, in call order.
    pub fn excerpts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|MockExtractorCall::ExtractFields { excerpt }| excerpt)
            .collect()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl FieldExtractor for MockFieldExtractor {
    async fn extract_fields(&self, excerpt: &str) -> Result<serde_json::Value> {
        self.calls
            .write()
            .unwrap()
            .push(MockExtractorCall::ExtractFields {
                excerpt: excerpt.to_string(),
            });

        let next = self.queued.write().unwrap().pop_front();
        let response = next.or_else(|| self.default.read().unwrap().clone());

        match response {
            Some(MockResponse::Value(value)) => Ok(value),
            Some(MockResponse::Failure(reason)) => Err(DiagnosticsError::Fallback(reason.into())),
            None => Ok(serde_json::json!({})),
        }
    }
}

/// A reading with placeholder identity and a small disk-health record.
pub fn reading_fixture(stage: CaptureStage) -> Reading {
    let raw_content = fixtures::CRYSTAL_DISK_INFO.to_string();
    Reading {
        id: Uuid::now_v7(),
        device_id: Uuid::new_v4(),
        order_id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        source_family: SourceFamily::DiskHealth,
        stage,
        file_name: "CrystalDiskInfo.txt".to_string(),
        fields: ExtractedFields {
            ssd_health_percent: Some(96),
            ssd_total_bytes_written_gb: Some(2048),
            ..Default::default()
        },
        health_score: 96,
        fallback_used: false,
        content_hash: Reading::hash_content(&raw_content),
        raw_content,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Sample logs as the supported tools write them.
pub mod fixtures {
    /// CrystalDiskInfo, English UI.
    pub const CRYSTAL_DISK_INFO: &str = "\
----------------------------------------------------------------------------
CrystalDiskInfo 9.1.1 (C) 2008-2023 hiyohiyo
                                Crystal Dew World: https://crystalmark.info/
----------------------------------------------------------------------------

    OS : Windows 11 Professional [10.0 Build 22631] (x64)

-- Disk List ---------------------------------------------------------------
 (1) Samsung SSD 870 EVO 500GB : 500.1 GB [0/0/0, sa1] - sm

----------------------------------------------------------------------------
 (1) Samsung SSD 870 EVO 500GB
----------------------------------------------------------------------------
           Model : Samsung SSD 870 EVO 500GB
        Firmware : SVT02B6Q
       Disk Size : 500.1 GB (8.4/137.4/500.1/500.1)
       Interface : Serial ATA
   Health Status : Good (96 %)
     Temperature : 32 C (89 F)
     Host Writes : 2048 GB
";

    /// AIDA64 summary and sensor pages, English UI.
    pub const AIDA64_REPORT: &str = "\
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
      CPU Package                                       72 °C  (162 °F)
      CPU #1 / Core #1                                  69 °C  (156 °F)

--------[ Power Management ]----------------------------------------------------

    Battery Properties:
      Wear Level                                        20 %
";

    /// AIDA64 sensor page without CPU or memory details.
    pub const AIDA64_SENSORS_ONLY: &str = "\
AIDA64 Extreme
--------[ Sensor ]--------------------------------------------------------------

    Temperatures:
      CPU Package                                       60 °C  (140 °F)

--------[ Power Management ]----------------------------------------------------

    Battery Properties:
      Wear Level                                        10 %
";

    /// HWMonitor text report.
    pub const HWMONITOR_REPORT: &str = "CPUID HWMonitor Report\n\
-------------------------------------------------------------------------\n\
\n\
Mainboard Model\tPRIME B450M-A (0x00000229 - 0x008ADC84)\n\
\n\
Processor 0\tID = 0\n\
\tNumber of cores\t6 (max 8)\n\
\tName\tAMD Ryzen 5 3600\n\
\n\
DIMM # 1\n\
\tSize\t8192 MBytes\n\
\tMax bandwidth\tDDR4-3200 (1600 MHz)\n\
\n\
DIMM # 2\n\
\tSize\t8192 MBytes\n\
\tMax bandwidth\tDDR4-3200 (1600 MHz)\n\
\n\
Hardware monitor\tAMD Ryzen 5 3600\n\
\tTemperature 0\t58 degC (136 degF) [0x3A] (Package)\n";
}

//! Integration tests for the ingest and reprocess flows.
//!
//! These tests drive the public `Processor` API end to end:
//! 1. Tenant resolution
//! 2. Sniffing and pattern extraction
//! 3. Fallback and merge
//! 4. Scoring and compaction
//! 5. Persistence and reprocessing

use diagnostics::{
    testing::{fixtures, reading_fixture},
    CaptureStage, DiagnosticsError, DisabledExtractor, Field, IngestRequest, IngestResponse,
    MemoryStore, MockFieldExtractor, PipelineConfig, Processor, ReadingStore, ReprocessResponse,
    RequestContext, SourceFamily,
};
use serde_json::json;
use uuid::Uuid;

/// Helper to build a request with an explicit tenant.
fn request(order_id: Uuid, stage: CaptureStage, file_name: &str, content: &str) -> IngestRequest {
    IngestRequest::new(order_id, Uuid::new_v4(), stage, file_name, content)
        .with_tenant(Uuid::new_v4())
}

#[tokio::test]
async fn test_disk_health_log_scores_from_ssd_health() {
    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);

    let outcome = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "CrystalDiskInfo.txt", fixtures::CRYSTAL_DISK_INFO),
            &RequestContext::new(),
        )
        .await
        .unwrap();

    let reading = &outcome.reading;
    assert_eq!(reading.source_family, SourceFamily::DiskHealth);
    assert_eq!(reading.fields.ssd_health_percent, Some(96));
    assert_eq!(reading.fields.ssd_total_bytes_written_gb, Some(2048));
    assert_eq!(reading.health_score, 96);
    assert!(!reading.fallback_used);

    let stored = processor.store().get_reading(reading.id).await.unwrap().unwrap();
    assert_eq!(&stored, reading);
}

#[tokio::test]
async fn test_fallback_fills_missing_essentials() {
    let mock = MockFieldExtractor::new().with_response(json!({
        "cpu_model": "X",
        "ram_total_gb": 16,
        "cpu_temp_max_c": 95,
    }));
    let handle = mock.clone();
    let processor = Processor::new(MemoryStore::new(), mock);

    let outcome = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "aida64.txt", fixtures::AIDA64_SENSORS_ONLY),
            &RequestContext::new(),
        )
        .await
        .unwrap();

    let reading = &outcome.reading;
    assert_eq!(reading.source_family, SourceFamily::SensorReport);
    assert_eq!(reading.fields.cpu_model.as_deref(), Some("X"));
    assert_eq!(reading.fields.ram_total_gb, Some(16));
    // Pattern value wins over the fallback's 95
    assert_eq!(reading.fields.cpu_temp_max_c, Some(60));
    assert_eq!(reading.fields.battery_wear_percent, Some(10.0));
    assert_eq!(reading.health_score, 90);
    assert!(reading.fallback_used);
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn test_fallback_failure_still_persists_pattern_fields() {
    let processor = Processor::new(MemoryStore::new(), MockFieldExtractor::new().failing());

    let outcome = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "aida64.txt", fixtures::AIDA64_SENSORS_ONLY),
            &RequestContext::new(),
        )
        .await
        .unwrap();

    assert!(!outcome.reading.fallback_used);
    assert_eq!(outcome.reading.fields.cpu_model, None);
    assert_eq!(outcome.reading.health_score, 90);
    assert_eq!(processor.store().reading_count(), 1);
}

#[tokio::test]
async fn test_complete_pattern_result_skips_fallback() {
    let mock = MockFieldExtractor::new();
    let handle = mock.clone();
    let processor = Processor::new(MemoryStore::new(), mock);

    let outcome = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "hwmonitor.txt", fixtures::HWMONITOR_REPORT),
            &RequestContext::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.reading.source_family, SourceFamily::MonitorReport);
    assert_eq!(outcome.reading.fields.cpu_model.as_deref(), Some("AMD Ryzen 5 3600"));
    assert_eq!(outcome.reading.fields.ram_total_gb, Some(16));
    assert_eq!(handle.call_count(), 0);
}

#[tokio::test]
async fn test_explicit_tenant_wins_without_lookup() {
    let store = MemoryStore::new();
    let order_id = Uuid::new_v4();
    store.register_order_owner(order_id, Uuid::new_v4());
    let processor = Processor::new(store, DisabledExtractor);

    let explicit = Uuid::new_v4();
    let context = RequestContext::new().with_session_tenant(Uuid::new_v4());
    let req = IngestRequest::new(
        order_id,
        Uuid::new_v4(),
        CaptureStage::Initial,
        "CrystalDiskInfo.txt",
        fixtures::CRYSTAL_DISK_INFO,
    )
    .with_tenant(explicit);

    let outcome = processor.ingest(req, &context).await.unwrap();
    assert_eq!(outcome.reading.tenant_id, explicit);
    assert_eq!(processor.store().owner_lookups(), 0);
}

#[tokio::test]
async fn test_order_owner_is_last_resort() {
    let store = MemoryStore::new();
    let order_id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    store.register_order_owner(order_id, owner);
    let processor = Processor::new(store, DisabledExtractor);

    let req = IngestRequest::new(
        order_id,
        Uuid::new_v4(),
        CaptureStage::Initial,
        "CrystalDiskInfo.txt",
        fixtures::CRYSTAL_DISK_INFO,
    );

    let outcome = processor.ingest(req, &RequestContext::new()).await.unwrap();
    assert_eq!(outcome.reading.tenant_id, owner);
    assert_eq!(processor.store().owner_lookups(), 1);
}

#[tokio::test]
async fn test_unrecognized_upload_persists_nothing() {
    let processor = Processor::new(MemoryStore::new(), MockFieldExtractor::new());

    let result = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "notes.txt", "Shopping list: eggs, milk\n"),
            &RequestContext::new(),
        )
        .await;

    let err = result.as_ref().unwrap_err();
    assert!(matches!(err, DiagnosticsError::UnrecognizedFormat { .. }));
    assert_eq!(processor.store().reading_count(), 0);

    let response = serde_json::to_value(IngestResponse::from(&result)).unwrap();
    assert_eq!(response["success"], false);
    assert!(response["error"].as_str().unwrap().starts_with("unsupported file"));
}

#[tokio::test]
async fn test_csv_without_diagnostics_persists_nothing() {
    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);

    let err = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "contacts.csv", "name,age\nbob,3\nalice,5\n"),
            &RequestContext::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DiagnosticsError::UnrecognizedFormat { .. }));
    assert_eq!(processor.store().reading_count(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_surfaced() {
    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);
    processor.store().fail_writes(true);

    let err = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "CrystalDiskInfo.txt", fixtures::CRYSTAL_DISK_INFO),
            &RequestContext::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DiagnosticsError::Storage(_)));
    assert!(err.is_fatal());
    assert_eq!(processor.store().reading_count(), 0);
}

#[tokio::test]
async fn test_success_response_envelope() {
    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);

    let result = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "CrystalDiskInfo.txt", fixtures::CRYSTAL_DISK_INFO),
            &RequestContext::new(),
        )
        .await;
    let reading_id = result.as_ref().unwrap().reading.id;

    let response = serde_json::to_value(IngestResponse::from(&result)).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["readingId"], reading_id.to_string());
    assert_eq!(response["healthScore"], 96);
    assert_eq!(response["extractedFields"]["ssdHealthPercent"], 96);
    assert!(response.get("error").is_none());
}

#[tokio::test]
async fn test_large_headerless_log_is_truncated_on_ingest() {
    let mut log = String::from("CrystalDiskInfo 9.1.1\nHealth Status : Good (96 %)\n");
    for i in 0..998 {
        log.push_str(&format!("attribute row {i}\n"));
    }

    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);
    let outcome = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Initial, "CrystalDiskInfo.txt", &log),
            &RequestContext::new(),
        )
        .await
        .unwrap();

    let reading = &outcome.reading;
    assert_eq!(reading.raw_content.lines().count(), 501);
    assert!(reading.raw_content.contains("truncated"));
    assert_eq!(reading.content_hash, diagnostics::Reading::hash_content(&log));
    assert_eq!(reading.health_score, 96);
}

#[tokio::test]
async fn test_reprocess_refreshes_stale_fields() {
    let store = MemoryStore::new();
    let mut stale = reading_fixture(CaptureStage::Initial);
    stale.fields.ssd_health_percent = Some(40);
    stale.fields.ssd_total_bytes_written_gb = None;
    stale.health_score = 40;
    store.insert_reading(&stale).await.unwrap();

    let processor = Processor::new(store, DisabledExtractor);
    let outcome = processor.reprocess(stale.id).await.unwrap();

    assert_eq!(outcome.health_score, 96);
    assert_eq!(outcome.updated_fields.ssd_total_bytes_written_gb, Some(2048));

    let stored = processor.store().get_reading(stale.id).await.unwrap().unwrap();
    assert_eq!(stored.health_score, 96);
    assert_eq!(stored.raw_content, stale.raw_content);
    assert_eq!(stored.content_hash, stale.content_hash);
    assert!(stored.updated_at.is_some());

    let response = serde_json::to_value(ReprocessResponse::from(&Ok(outcome))).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["healthScore"], 96);
}

#[tokio::test]
async fn test_reprocess_is_deterministic() {
    let processor = Processor::with_config(
        MemoryStore::new(),
        DisabledExtractor,
        PipelineConfig::default().without_fallback(),
    );

    let outcome = processor
        .ingest(
            request(Uuid::new_v4(), CaptureStage::Final, "report.txt", fixtures::AIDA64_REPORT),
            &RequestContext::new(),
        )
        .await
        .unwrap();
    let id = outcome.reading.id;

    let first = processor.reprocess(id).await.unwrap();
    let second = processor.reprocess(id).await.unwrap();

    assert_eq!(first.updated_fields, second.updated_fields);
    assert_eq!(first.health_score, second.health_score);
    assert_eq!(first.updated_fields, outcome.reading.fields);
    assert_eq!(first.health_score, 79);
}

#[tokio::test]
async fn test_reprocess_unknown_reading() {
    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);
    let id = Uuid::new_v4();

    let err = processor.reprocess(id).await.unwrap_err();
    assert!(matches!(err, DiagnosticsError::ReadingNotFound { id: missing } if missing == id));
}

#[tokio::test]
async fn test_order_overview_groups_stages() {
    let processor = Processor::new(MemoryStore::new(), DisabledExtractor);
    let order_id = Uuid::new_v4();

    for (stage, file_name, content) in [
        (CaptureStage::Initial, "CrystalDiskInfo.txt", fixtures::CRYSTAL_DISK_INFO),
        (CaptureStage::Final, "aida64.txt", fixtures::AIDA64_REPORT),
    ] {
        processor
            .ingest(request(order_id, stage, file_name, content), &RequestContext::new())
            .await
            .unwrap();
    }

    let overview = processor.order_overview(order_id).await.unwrap();
    assert_eq!(overview.reading_count, 2);
    assert_eq!(overview.stages.len(), 2);
    assert_eq!(overview.stages[0].stage, CaptureStage::Initial);
    assert_eq!(overview.stages[1].stage, CaptureStage::Final);

    assert_eq!(overview.latest.ssd_health_percent, Some(96));
    assert!(overview.latest.has(Field::CpuModel));
    assert!(overview
        .latest
        .cpu_model
        .as_deref()
        .is_some_and(|cpu| cpu.contains("i5-8250U")));
}

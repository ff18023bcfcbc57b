//! Read-time views over the readings of one order. Nothing here is stored.

use uuid::Uuid;

use crate::types::fields::ExtractedFields;
use crate::types::outcome::{OrderOverview, StageSnapshot};
use crate::types::reading::Reading;

/// Most recent non-null value per field across `readings`.
pub fn latest_values(readings: &[Reading]) -> ExtractedFields {
    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let mut latest = ExtractedFields::new();
    for reading in ordered {
        latest.fill_missing_from(&reading.fields);
    }
    latest
}

/// Most recent reading per stage, in workflow order.
pub fn stage_snapshots(readings: &[Reading]) -> Vec<StageSnapshot> {
    let mut snapshots: Vec<(StageSnapshot, &Reading)> = Vec::new();

    for reading in readings {
        let snapshot = StageSnapshot {
            stage: reading.stage,
            reading_id: reading.id,
            health_score: reading.health_score,
            fields: reading.fields.clone(),
        };
        match snapshots.iter_mut().find(|(s, _)| s.stage == reading.stage) {
            Some(existing) if (existing.1.created_at, existing.1.id) < (reading.created_at, reading.id) => {
                *existing = (snapshot, reading);
            }
            Some(_) => {}
            None => snapshots.push((snapshot, reading)),
        }
    }

    let mut snapshots: Vec<StageSnapshot> = snapshots.into_iter().map(|(s, _)| s).collect();
    snapshots.sort_by_key(|s| s.stage);
    snapshots
}

/// Full overview of an order.
pub fn order_overview(order_id: Uuid, readings: &[Reading]) -> OrderOverview {
    OrderOverview {
        order_id,
        stages: stage_snapshots(readings),
        latest: latest_values(readings),
        reading_count: readings.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::reading_fixture;
    use crate::types::reading::CaptureStage;
    use chrono::{Duration, Utc};

    #[test]
    fn test_latest_non_null_per_field() {
        let now = Utc::now();
        let mut older = reading_fixture(CaptureStage::Initial);
        older.created_at = now - Duration::hours(2);
        older.fields.cpu_model = Some("Old CPU".into());
        older.fields.ssd_health_percent = Some(70);

        let mut newer = reading_fixture(CaptureStage::PostRepair);
        newer.created_at = now;
        newer.fields.ssd_health_percent = Some(100);

        let latest = latest_values(&[newer, older]);
        assert_eq!(latest.ssd_health_percent, Some(100));
        assert_eq!(latest.cpu_model.as_deref(), Some("Old CPU"));
    }

    #[test]
    fn test_stage_snapshots_keep_newest_per_stage() {
        let now = Utc::now();
        let mut first = reading_fixture(CaptureStage::Initial);
        first.created_at = now - Duration::minutes(10);
        first.health_score = 40;

        let mut retry = reading_fixture(CaptureStage::Initial);
        retry.created_at = now;
        retry.health_score = 45;

        let mut done = reading_fixture(CaptureStage::Final);
        done.created_at = now - Duration::minutes(5);
        done.health_score = 90;

        let overview = order_overview(first.order_id, &[done, first, retry.clone()]);
        assert_eq!(overview.reading_count, 3);
        assert_eq!(overview.stages.len(), 2);
        assert_eq!(overview.stages[0].stage, CaptureStage::Initial);
        assert_eq!(overview.stages[0].reading_id, retry.id);
        assert_eq!(overview.stages[1].stage, CaptureStage::Final);
        assert_eq!(overview.stages[1].health_score, 90);
    }
}

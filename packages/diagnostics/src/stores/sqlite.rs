//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - Local development
//! - Single-workshop deployments
//! - Testing with persistent data

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{DiagnosticsError, Result};
use crate::traits::store::{OrderDirectory, ReadingStore};
use crate::types::{
    fields::ExtractedFields,
    reading::{CaptureStage, DerivedUpdate, Reading, SourceFamily},
};

const READING_COLUMNS: &str = "id, device_id, order_id, tenant_id, source_family, stage, file_name, \
     cpu_model, motherboard_model, gpu_model, ram_total_gb, ram_speed_mhz, ram_slots, \
     ssd_health_percent, ssd_total_gb, ssd_total_bytes_written_gb, cpu_temp_max_c, \
     battery_wear_percent, battery_cycles, health_score, fallback_used, raw_content, \
     content_hash, created_at, updated_at";

/// SQLite-based reading store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://./diagnostics.db` - File-based database
    /// - `sqlite://./diagnostics.db?mode=rwc` - Create if not exists
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// Uses a single connection: every new connection to `sqlite::memory:`
    /// would open its own empty database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(DiagnosticsError::storage)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS readings (
                id TEXT PRIMARY KEY,
                device_id TEXT NOT NULL,
                order_id TEXT NOT NULL,
                tenant_id TEXT NOT NULL,
                source_family TEXT NOT NULL,
                stage TEXT NOT NULL,
                file_name TEXT NOT NULL,
                cpu_model TEXT,
                motherboard_model TEXT,
                gpu_model TEXT,
                ram_total_gb INTEGER,
                ram_speed_mhz INTEGER,
                ram_slots INTEGER,
                ssd_health_percent INTEGER,
                ssd_total_gb INTEGER,
                ssd_total_bytes_written_gb INTEGER,
                cpu_temp_max_c INTEGER,
                battery_wear_percent REAL,
                battery_cycles INTEGER,
                health_score INTEGER NOT NULL,
                fallback_used INTEGER NOT NULL DEFAULT 0,
                raw_content TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_readings_order ON readings(order_id, stage);
            CREATE INDEX IF NOT EXISTS idx_readings_tenant ON readings(tenant_id);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS order_owners (
                order_id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Record (or replace) the tenant that owns an order.
    pub async fn register_order_owner(&self, order_id: Uuid, tenant_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO order_owners (order_id, tenant_id) VALUES (?, ?)
            ON CONFLICT(order_id) DO UPDATE SET tenant_id = excluded.tenant_id
            "#,
        )
        .bind(order_id.to_string())
        .bind(tenant_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;
        Ok(())
    }
}

/// Fixed-width timestamps so lexical order matches time order.
fn format_time(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DiagnosticsError::storage(format!("Invalid date: {}", e)))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| DiagnosticsError::storage(format!("Invalid id {}: {}", s, e)))
}

// Row type for sqlx queries
#[derive(Debug, FromRow)]
struct ReadingRow {
    id: String,
    device_id: String,
    order_id: String,
    tenant_id: String,
    source_family: String,
    stage: String,
    file_name: String,
    cpu_model: Option<String>,
    motherboard_model: Option<String>,
    gpu_model: Option<String>,
    ram_total_gb: Option<i64>,
    ram_speed_mhz: Option<i64>,
    ram_slots: Option<i64>,
    ssd_health_percent: Option<i64>,
    ssd_total_gb: Option<i64>,
    ssd_total_bytes_written_gb: Option<i64>,
    cpu_temp_max_c: Option<i64>,
    battery_wear_percent: Option<f64>,
    battery_cycles: Option<i64>,
    health_score: i64,
    fallback_used: bool,
    raw_content: String,
    content_hash: String,
    created_at: String,
    updated_at: Option<String>,
}

impl ReadingRow {
    fn into_reading(self) -> Result<Reading> {
        let source_family = SourceFamily::parse(&self.source_family).ok_or_else(|| {
            DiagnosticsError::storage(format!("Invalid source family: {}", self.source_family))
        })?;
        let stage = CaptureStage::parse(&self.stage)
            .ok_or_else(|| DiagnosticsError::storage(format!("Invalid stage: {}", self.stage)))?;
        let updated_at = self.updated_at.as_deref().map(parse_time).transpose()?;

        Ok(Reading {
            id: parse_uuid(&self.id)?,
            device_id: parse_uuid(&self.device_id)?,
            order_id: parse_uuid(&self.order_id)?,
            tenant_id: parse_uuid(&self.tenant_id)?,
            source_family,
            stage,
            file_name: self.file_name,
            fields: ExtractedFields {
                cpu_model: self.cpu_model,
                motherboard_model: self.motherboard_model,
                gpu_model: self.gpu_model,
                ram_total_gb: self.ram_total_gb,
                ram_speed_mhz: self.ram_speed_mhz,
                ram_slots: self.ram_slots,
                ssd_health_percent: self.ssd_health_percent,
                ssd_total_gb: self.ssd_total_gb,
                ssd_total_bytes_written_gb: self.ssd_total_bytes_written_gb,
                cpu_temp_max_c: self.cpu_temp_max_c,
                battery_wear_percent: self.battery_wear_percent,
                battery_cycles: self.battery_cycles,
            },
            health_score: self.health_score.clamp(0, 100) as u8,
            fallback_used: self.fallback_used,
            raw_content: self.raw_content,
            content_hash: self.content_hash,
            created_at: parse_time(&self.created_at)?,
            updated_at,
        })
    }
}

#[async_trait]
impl ReadingStore for SqliteStore {
    async fn insert_reading(&self, reading: &Reading) -> Result<()> {
        let f = &reading.fields;
        sqlx::query(&format!(
            "INSERT INTO readings ({READING_COLUMNS}) VALUES \
             (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(reading.id.to_string())
        .bind(reading.device_id.to_string())
        .bind(reading.order_id.to_string())
        .bind(reading.tenant_id.to_string())
        .bind(reading.source_family.as_str())
        .bind(reading.stage.as_str())
        .bind(&reading.file_name)
        .bind(&f.cpu_model)
        .bind(&f.motherboard_model)
        .bind(&f.gpu_model)
        .bind(f.ram_total_gb)
        .bind(f.ram_speed_mhz)
        .bind(f.ram_slots)
        .bind(f.ssd_health_percent)
        .bind(f.ssd_total_gb)
        .bind(f.ssd_total_bytes_written_gb)
        .bind(f.cpu_temp_max_c)
        .bind(f.battery_wear_percent)
        .bind(f.battery_cycles)
        .bind(reading.health_score as i64)
        .bind(reading.fallback_used)
        .bind(&reading.raw_content)
        .bind(&reading.content_hash)
        .bind(format_time(&reading.created_at))
        .bind(reading.updated_at.as_ref().map(format_time))
        .execute(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;

        Ok(())
    }

    async fn get_reading(&self, id: Uuid) -> Result<Option<Reading>> {
        let row = sqlx::query_as::<_, ReadingRow>(&format!(
            "SELECT {READING_COLUMNS} FROM readings WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;

        row.map(ReadingRow::into_reading).transpose()
    }

    async fn update_derived(&self, id: Uuid, update: &DerivedUpdate) -> Result<bool> {
        let f = &update.fields;
        let result = sqlx::query(
            r#"
            UPDATE readings SET
                source_family = ?,
                cpu_model = ?,
                motherboard_model = ?,
                gpu_model = ?,
                ram_total_gb = ?,
                ram_speed_mhz = ?,
                ram_slots = ?,
                ssd_health_percent = ?,
                ssd_total_gb = ?,
                ssd_total_bytes_written_gb = ?,
                cpu_temp_max_c = ?,
                battery_wear_percent = ?,
                battery_cycles = ?,
                health_score = ?,
                fallback_used = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.source_family.as_str())
        .bind(&f.cpu_model)
        .bind(&f.motherboard_model)
        .bind(&f.gpu_model)
        .bind(f.ram_total_gb)
        .bind(f.ram_speed_mhz)
        .bind(f.ram_slots)
        .bind(f.ssd_health_percent)
        .bind(f.ssd_total_gb)
        .bind(f.ssd_total_bytes_written_gb)
        .bind(f.cpu_temp_max_c)
        .bind(f.battery_wear_percent)
        .bind(f.battery_cycles)
        .bind(update.health_score as i64)
        .bind(update.fallback_used)
        .bind(format_time(&update.updated_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn readings_for_order(&self, order_id: Uuid) -> Result<Vec<Reading>> {
        let rows = sqlx::query_as::<_, ReadingRow>(&format!(
            "SELECT {READING_COLUMNS} FROM readings WHERE order_id = ? ORDER BY created_at, id"
        ))
        .bind(order_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(DiagnosticsError::storage)?;

        rows.into_iter().map(ReadingRow::into_reading).collect()
    }
}

#[async_trait]
impl OrderDirectory for SqliteStore {
    async fn order_owner(&self, order_id: Uuid) -> Result<Option<Uuid>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT tenant_id FROM order_owners WHERE order_id = ?")
                .bind(order_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(DiagnosticsError::storage)?;

        row.map(|(tenant_id,)| parse_uuid(&tenant_id)).transpose()
    }
}

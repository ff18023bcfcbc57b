//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{DiagnosticsError, Result};
use crate::traits::store::{OrderDirectory, ReadingStore};
use crate::types::reading::{DerivedUpdate, Reading};

/// In-memory storage for readings and order owners.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    readings: RwLock<HashMap<Uuid, Reading>>,
    owners: RwLock<HashMap<Uuid, Uuid>>,
    owner_lookups: AtomicUsize,
    fail_writes: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(HashMap::new()),
            owners: RwLock::new(HashMap::new()),
            owner_lookups: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Record the tenant that owns an order.
    pub fn register_order_owner(&self, order_id: Uuid, tenant_id: Uuid) {
        self.owners.write().unwrap().insert(order_id, tenant_id);
    }

    /// Make every subsequent write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `order_owner` lookups served.
    pub fn owner_lookups(&self) -> usize {
        self.owner_lookups.load(Ordering::SeqCst)
    }

    /// Get the number of stored readings.
    pub fn reading_count(&self) -> usize {
        self.readings.read().unwrap().len()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.readings.write().unwrap().clear();
        self.owners.write().unwrap().clear();
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DiagnosticsError::storage("write rejected: store is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn insert_reading(&self, reading: &Reading) -> Result<()> {
        self.check_writable()?;
        let mut readings = self.readings.write().unwrap();
        if readings.contains_key(&reading.id) {
            return Err(DiagnosticsError::storage(format!(
                "duplicate reading id {}",
                reading.id
            )));
        }
        readings.insert(reading.id, reading.clone());
        Ok(())
    }

    async fn get_reading(&self, id: Uuid) -> Result<Option<Reading>> {
        Ok(self.readings.read().unwrap().get(&id).cloned())
    }

    async fn update_derived(&self, id: Uuid, update: &DerivedUpdate) -> Result<bool> {
        self.check_writable()?;
        match self.readings.write().unwrap().get_mut(&id) {
            Some(reading) => {
                reading.apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn readings_for_order(&self, order_id: Uuid) -> Result<Vec<Reading>> {
        let mut readings: Vec<Reading> = self
            .readings
            .read()
            .unwrap()
            .values()
            .filter(|r| r.order_id == order_id)
            .cloned()
            .collect();
        readings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(readings)
    }
}

#[async_trait]
impl OrderDirectory for MemoryStore {
    async fn order_owner(&self, order_id: Uuid) -> Result<Option<Uuid>> {
        self.owner_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.owners.read().unwrap().get(&order_id).copied())
    }
}

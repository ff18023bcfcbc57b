//! Storage traits for readings and order ownership.
//!
//! - `ReadingStore`: persisted readings
//! - `OrderDirectory`: who owns an order (last tenant-resolution source)

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::reading::{DerivedUpdate, Reading};

/// Store for persisted readings.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Insert a new reading. Atomic: either the whole row lands or nothing.
    async fn insert_reading(&self, reading: &Reading) -> Result<()>;

    /// Get a reading by id.
    async fn get_reading(&self, id: Uuid) -> Result<Option<Reading>>;

    /// Overwrite the derived fields of a reading. Raw content is untouched.
    ///
    /// Returns false if no reading has that id.
    async fn update_derived(&self, id: Uuid, update: &DerivedUpdate) -> Result<bool>;

    /// All readings of an order, oldest first.
    async fn readings_for_order(&self, order_id: Uuid) -> Result<Vec<Reading>>;
}

/// Lookup of the tenant that owns an order.
#[async_trait]
pub trait OrderDirectory: Send + Sync {
    async fn order_owner(&self, order_id: Uuid) -> Result<Option<Uuid>>;
}

#[async_trait]
impl<T: ReadingStore + ?Sized> ReadingStore for std::sync::Arc<T> {
    async fn insert_reading(&self, reading: &Reading) -> Result<()> {
        (**self).insert_reading(reading).await
    }

    async fn get_reading(&self, id: Uuid) -> Result<Option<Reading>> {
        (**self).get_reading(id).await
    }

    async fn update_derived(&self, id: Uuid, update: &DerivedUpdate) -> Result<bool> {
        (**self).update_derived(id, update).await
    }

    async fn readings_for_order(&self, order_id: Uuid) -> Result<Vec<Reading>> {
        (**self).readings_for_order(order_id).await
    }
}

#[async_trait]
impl<T: OrderDirectory + ?Sized> OrderDirectory for std::sync::Arc<T> {
    async fn order_owner(&self, order_id: Uuid) -> Result<Option<Uuid>> {
        (**self).order_owner(order_id).await
    }
}

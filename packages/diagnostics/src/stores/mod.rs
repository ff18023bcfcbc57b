//! Reading stores.
//!
//! `MemoryStore` is always built; the SQL backends sit behind the
//! `sqlite` and `postgres` features. Each store also answers order
//! ownership lookups for tenant resolution.

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

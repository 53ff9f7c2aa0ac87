//! Storage adapters
//!
//! Implementations of the StoragePort trait:
//! - Memory (default, process-local)
//! - SQLite (durable)

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

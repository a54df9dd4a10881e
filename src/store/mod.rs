//! Record store implementations

pub mod memory;
pub mod sqlite;

// Re-export for convenience
pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

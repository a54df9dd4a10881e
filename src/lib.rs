//! Milestone Tracker Library
//!
//! Watches a stream of asset announcements, records each asset's baseline
//! valuation, and periodically re-checks a live market-data source to detect
//! and announce milestone multiples (2x, 3x, ...) exactly once per level.

// Public modules - these are the API surface
pub mod config;
pub mod error;
pub mod evaluator;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod parse;
pub mod providers;
pub mod store;
pub mod telegram_notifier;
pub mod tracker;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use config::{Config, DuplicatePolicy};
pub use error::TrackerError;
pub use evaluator::{evaluate, Evaluation, MilestoneStrategy};
pub use handlers::{CompositeNotifier, ConsoleNotifier, TelegramMilestoneNotifier};
pub use ingest::IngestionHandler;
pub use models::{
    asset::AssetProgress,
    milestone::MilestoneEvent,
    TrackedAsset,
};
pub use providers::DexScreenerProvider;
pub use store::{MemoryRecordStore, SqliteRecordStore};
pub use tracker::MilestoneTracker;
pub use traits::{MilestoneNotifier, RecordStore, ValuationProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, anyhow::Error>;

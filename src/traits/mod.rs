//! Core traits for the milestone tracker

pub mod notifier;
pub mod record_store;
pub mod valuation_provider;

// Re-export for convenience
pub use notifier::MilestoneNotifier;
pub use record_store::RecordStore;
pub use valuation_provider::ValuationProvider;

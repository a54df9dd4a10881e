//! Data models for the milestone tracker

pub mod asset;
pub mod milestone;

// Re-export for convenience
pub use asset::{AssetProgress, TrackedAsset};
pub use milestone::MilestoneEvent;

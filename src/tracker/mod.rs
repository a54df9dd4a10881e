pub mod milestone_tracker;

pub use milestone_tracker::MilestoneTracker;

//! Notifier implementations

pub mod composite;
pub mod console;
pub mod telegram;

// Re-export for convenience
pub use composite::CompositeNotifier;
pub use console::ConsoleNotifier;
pub use telegram::TelegramMilestoneNotifier;

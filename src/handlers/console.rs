use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::MilestoneEvent;
use crate::traits::notifier::MilestoneNotifier;
use crate::utils::helper::abbreviate_usd;

/// Console logging notifier
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MilestoneNotifier for ConsoleNotifier {
    async fn notify(&self, event: &MilestoneEvent) {
        info!("{}", "=".repeat(60));
        info!("MILESTONE: {}", event.summary());
        info!("  Baseline: {}", abbreviate_usd(event.baseline_value));
        info!("  ATH:      {}", abbreviate_usd(event.all_time_high));
        info!("  Level:    {:.1}x", event.multiple);
        info!("{}", "=".repeat(60));
    }

    async fn notify_status(&self, message: &str) {
        info!("{}", message);
    }

    async fn notify_error(&self, error: &anyhow::Error) {
        warn!("tracker error: {error:#}");
    }
}

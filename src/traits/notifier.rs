use async_trait::async_trait;

use crate::models::MilestoneEvent;

/// Handler for milestone-crossing events.
///
/// Implementations swallow their own delivery failures (logging them), so a
/// temporarily unavailable channel can never block the tracking loop or the
/// persistence write that follows.
#[async_trait]
pub trait MilestoneNotifier: Send + Sync {
    /// Deliver a milestone-crossing event.
    async fn notify(&self, event: &MilestoneEvent);

    /// Deliver a free-form status line (startup/shutdown notices).
    async fn notify_status(&self, message: &str);

    /// Handle an error surfaced by the tracking loop.
    async fn notify_error(&self, error: &anyhow::Error);
}

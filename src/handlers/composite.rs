use std::sync::Arc;

use async_trait::async_trait;

use crate::models::MilestoneEvent;
use crate::traits::notifier::MilestoneNotifier;

/// Composite notifier that fans out to multiple channels
pub struct CompositeNotifier {
    notifiers: Vec<Arc<dyn MilestoneNotifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self { notifiers: Vec::new() }
    }

    pub fn add_notifier(&mut self, notifier: Arc<dyn MilestoneNotifier>) {
        self.notifiers.push(notifier);
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }
}

impl Default for CompositeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MilestoneNotifier for CompositeNotifier {
    async fn notify(&self, event: &MilestoneEvent) {
        for notifier in &self.notifiers {
            notifier.notify(event).await;
        }
    }

    async fn notify_status(&self, message: &str) {
        for notifier in &self.notifiers {
            notifier.notify_status(message).await;
        }
    }

    async fn notify_error(&self, error: &anyhow::Error) {
        for notifier in &self.notifiers {
            notifier.notify_error(error).await;
        }
    }
}

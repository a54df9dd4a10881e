use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::MilestoneEvent;
use crate::telegram_notifier::TelegramNotifier;
use crate::traits::notifier::MilestoneNotifier;
use crate::utils::helper::{abbreviate_usd, capitalize};

/// Telegram milestone notifier
pub struct TelegramMilestoneNotifier {
    notifier: TelegramNotifier,
}

impl TelegramMilestoneNotifier {
    pub fn new(notifier: TelegramNotifier) -> Self {
        Self { notifier }
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_enabled()
    }

    /// Render the milestone message: headline, baseline vs ATH line, and an
    /// UPDATE marker when a lower level was announced before.
    fn format_milestone(&self, event: &MilestoneEvent) -> String {
        let headline = format!(
            "${} HIT 💎{:.1}X💎 AFTER CALL",
            event.symbol, event.multiple
        );
        let body = format!(
            "🟢 Called At: <b>{}</b> MC\n📈 ATH: <b>{}</b> | Chain: {}",
            abbreviate_usd(event.baseline_value),
            abbreviate_usd(event.all_time_high),
            capitalize(&event.chain),
        );

        let mut parts = Vec::new();
        if event.is_update {
            parts.push("🔥UPDATE🔥".to_string());
        }
        parts.push(headline);
        parts.push(body);
        parts.join("\n\n")
    }
}

#[async_trait]
impl MilestoneNotifier for TelegramMilestoneNotifier {
    async fn notify(&self, event: &MilestoneEvent) {
        let message = self.format_milestone(event);
        match self.notifier.send_notification(&message).await {
            Ok(()) => info!(
                "Sent Telegram milestone for {} ({:.1}x)",
                event.symbol, event.multiple
            ),
            Err(e) => warn!("failed to deliver milestone for {}: {e:#}", event.symbol),
        }
    }

    async fn notify_status(&self, message: &str) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
        let text = format!("⏰ <b>{}</b>\n{}", timestamp, message);
        if let Err(e) = self.notifier.send_notification(&text).await {
            warn!("failed to deliver status message: {e:#}");
        }
    }

    async fn notify_error(&self, error: &anyhow::Error) {
        let error_msg = format!(
            "❌ <b>Milestone Tracker Error</b>\n\n⚠️ <b>Error:</b> {}",
            error
        );
        if let Err(e) = self.notifier.send_notification(&error_msg).await {
            warn!("failed to deliver error notice: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(is_update: bool) -> MilestoneEvent {
        MilestoneEvent {
            symbol: "WIF".to_string(),
            chain: "solana".to_string(),
            baseline_value: 48_500.0,
            all_time_high: 291_000.0,
            multiple: 6.0,
            is_update,
        }
    }

    #[test]
    fn formats_first_milestone() {
        let handler = TelegramMilestoneNotifier::new(TelegramNotifier::new(None, None));
        let text = handler.format_milestone(&event(false));
        assert!(text.starts_with("$WIF HIT 💎6.0X💎 AFTER CALL"));
        assert!(text.contains("$48.5k"));
        assert!(text.contains("$291.0k"));
        assert!(text.contains("Chain: Solana"));
        assert!(!text.contains("UPDATE"));
    }

    #[test]
    fn marks_repeat_milestones_as_update() {
        let handler = TelegramMilestoneNotifier::new(TelegramNotifier::new(None, None));
        let text = handler.format_milestone(&event(true));
        assert!(text.starts_with("🔥UPDATE🔥"));
    }
}

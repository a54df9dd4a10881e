use reqwest::Client;
use serde_json;
use tracing::debug;

use crate::error::TrackerError;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Thin Telegram Bot API client. Disabled (no-op) when credentials are
/// missing so the rest of the system never has to care.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Option<Client>,
    token: Option<String>,
    chat_id: Option<String>,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, chat_id: Option<String>) -> Self {
        Self::with_api_base(TELEGRAM_API_BASE, token, chat_id)
    }

    pub fn with_api_base(
        api_base: impl Into<String>,
        token: Option<String>,
        chat_id: Option<String>,
    ) -> Self {
        let client = if token.is_some() && chat_id.is_some() {
            Some(Client::new())
        } else {
            None
        };

        Self { client, token, chat_id, api_base: api_base.into() }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some() && self.token.is_some() && self.chat_id.is_some()
    }

    /// Send an HTML-formatted message. A no-op `Ok` when disabled; any
    /// transport or API failure comes back as a delivery error for the
    /// caller to log.
    pub async fn send_notification(&self, message: &str) -> anyhow::Result<()> {
        let (Some(client), Some(token), Some(chat_id)) =
            (&self.client, &self.token, &self.chat_id)
        else {
            return Ok(());
        };

        let url = format!("{}/bot{}/sendMessage", self.api_base, token);

        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": message,
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        });

        let response = client
            .post(&url)
            .body(payload.to_string())
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| TrackerError::DeliveryFailure { reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::DeliveryFailure {
                reason: format!("Telegram API status {status}: {body}"),
            }
            .into());
        }

        debug!("Telegram notification sent successfully");
        Ok(())
    }
}

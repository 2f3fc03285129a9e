//! Delivery sink: pushes finished digest strings to a Telegram channel.
//!
//! The digest text is already escaped and markup-complete when it arrives
//! here; this client only moves bytes.

use std::time::Duration;

use serde_json::json;
use tracing::info;

use crate::config::DeliveryConfig;
use crate::errors::{FeedError, FeedResult};

const SERVICE: &str = "telegram";

pub struct TelegramSink {
    http: reqwest::Client,
    config: DeliveryConfig,
}

impl TelegramSink {
    pub fn new(config: DeliveryConfig) -> FeedResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { http, config })
    }

    /// Send one digest message to the configured channel
    pub async fn send_message(&self, text: &str) -> FeedResult<()> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.config.bot_token
        );
        let body = json!({
            "chat_id": self.config.channel_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }
        info!(chars = text.chars().count(), "delivered digest message");
        Ok(())
    }
}

//! Operator notifications.
//!
//! Delivery is fire-and-forget: a notifier never reports failure to its caller and
//! never retries, so a broken channel cannot hold up the scan of later domains.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use subwatch_common::config::TelegramCredentials;
use subwatch_protocols::message;
use tracing::debug;

use crate::sources::endpoint;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str);
}

/// Posts messages through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    credentials: TelegramCredentials,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        credentials: TelegramCredentials,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        let url = endpoint(&self.base_url, &message::send_message_path(&self.credentials.token));
        let form = message::telegram_form(&self.credentials.chat_id, text);

        match self.client.post(url).form(&form).timeout(self.timeout).send().await {
            Ok(response) => debug!("notification posted ({})", response.status()),
            // The URL embeds the bot token.
            Err(e) => debug!("notification dropped: {}", e.without_url()),
        }
    }
}

/// Used when no notification channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, text: &str) {
        debug!("notifications disabled, not sending: {text:?}");
    }
}

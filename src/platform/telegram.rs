use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use teloxide::payloads::{DeleteWebhookSetters, SetWebhookSetters};
use teloxide::prelude::*;
use tracing::{debug, info};

use crate::platform::Messenger;

/// [`Messenger`] backed by the Telegram Bot API.
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .with_context(|| format!("Failed to send message to chat {}", chat_id))?;
        debug!("Sent {} chars to chat {}", text.len(), chat_id);
        Ok(())
    }

    async fn set_webhook(&self, url: &str, drop_pending_updates: bool) -> Result<()> {
        let url = Url::parse(url).with_context(|| format!("Invalid webhook URL: {}", url))?;
        self.bot
            .set_webhook(url)
            .drop_pending_updates(drop_pending_updates)
            .await
            .context("setWebhook failed")?;
        Ok(())
    }

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        self.bot
            .delete_webhook()
            .drop_pending_updates(drop_pending_updates)
            .await
            .context("deleteWebhook failed")?;
        Ok(())
    }

    async fn initialize(&self) -> Result<()> {
        let me = self
            .bot
            .get_me()
            .await
            .context("Bot authentication failed")?;
        info!(
            "Bot authenticated: @{} (ID: {})",
            me.user.username.as_deref().unwrap_or("unknown"),
            me.user.id
        );
        Ok(())
    }
}

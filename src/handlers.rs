//! The bot's reply behaviors. Each handler sends exactly one text reply.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::platform::Messenger;
use crate::update::Update;

pub const START_TEXT: &str = "Привет! Я LEDYBOT 🌸 — твоя быстрая, умная и надёжная помощница!\n\
                              Скажи, что ищешь — и я всё подберу красиво.";

pub const HELP_TEXT: &str = "Я рядом: /start — приветствие, просто напиши, что искать.";

const ECHO_PREFIX: &str = "🔎 Ищу: «";
const ECHO_SUFFIX: &str = "»...\n(Пока тренировка, скоро — по-настоящему 🚀)";

#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, update: &Update, messenger: &dyn Messenger) -> Result<()>;
}

/// Reply into the chat the update's message came from.
async fn reply(update: &Update, messenger: &dyn Messenger, text: &str) -> Result<()> {
    let chat_id = update
        .message()
        .and_then(|m| m.reply_target())
        .ok_or_else(|| anyhow!("update {} has no chat to reply to", update.id))?;
    messenger.send_text(chat_id, text).await
}

pub struct StartHandler;

#[async_trait]
impl Handler for StartHandler {
    fn name(&self) -> &'static str {
        "start"
    }

    async fn handle(&self, update: &Update, messenger: &dyn Messenger) -> Result<()> {
        reply(update, messenger, START_TEXT).await
    }
}

pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn handle(&self, update: &Update, messenger: &dyn Messenger) -> Result<()> {
        reply(update, messenger, HELP_TEXT).await
    }
}

/// Fallback for text that matched no command.
pub struct EchoHandler;

pub fn echo_text(text: &str) -> String {
    format!("{}{}{}", ECHO_PREFIX, text.trim(), ECHO_SUFFIX)
}

#[async_trait]
impl Handler for EchoHandler {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn handle(&self, update: &Update, messenger: &dyn Messenger) -> Result<()> {
        let text = update
            .text()
            .ok_or_else(|| anyhow!("update {} has no text to echo", update.id))?;
        reply(update, messenger, &echo_text(text)).await
    }
}

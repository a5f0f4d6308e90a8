//! In-memory [`Messenger`] that records every call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::Messenger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendText { chat_id: i64, text: String },
    SetWebhook { url: String, drop_pending_updates: bool },
    DeleteWebhook { drop_pending_updates: bool },
    Initialize,
    Start,
    Stop,
    Shutdown,
}

#[derive(Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<Call>>,
    pub fail_sends: AtomicBool,
    pub fail_webhook: AtomicBool,
    pub fail_initialize: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `(chat_id, text)` of every successful send, in order.
    pub fn replies(&self) -> Vec<(i64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendText { chat_id, text } => Some((chat_id, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            bail!("send failed");
        }
        self.record(Call::SendText {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn set_webhook(&self, url: &str, drop_pending_updates: bool) -> Result<()> {
        self.record(Call::SetWebhook {
            url: url.to_string(),
            drop_pending_updates,
        });
        if self.fail_webhook.load(Ordering::SeqCst) {
            bail!("setWebhook rejected");
        }
        Ok(())
    }

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        self.record(Call::DeleteWebhook {
            drop_pending_updates,
        });
        if self.fail_webhook.load(Ordering::SeqCst) {
            bail!("deleteWebhook rejected");
        }
        Ok(())
    }

    async fn initialize(&self) -> Result<()> {
        if self.fail_initialize.load(Ordering::SeqCst) {
            bail!("invalid token");
        }
        self.record(Call::Initialize);
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        self.record(Call::Start);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.record(Call::Stop);
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.record(Call::Shutdown);
        Ok(())
    }
}

pub mod telegram;

#[cfg(test)]
pub mod testing;

use anyhow::Result;
use async_trait::async_trait;

/// Outbound side of the chat platform.
///
/// Sends are fire-and-forget from the webhook's point of view: callers log a
/// failed send and move on, nothing is retried.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn set_webhook(&self, url: &str, drop_pending_updates: bool) -> Result<()>;

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()>;

    /// Verify credentials and prepare the client. Called once before `start`.
    async fn initialize(&self) -> Result<()>;

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }

    /// Release client resources. Called once after `stop`.
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

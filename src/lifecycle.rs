use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info};

use crate::platform::Messenger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Brings the messaging client up and registers the webhook on start; tears
/// both down on stop.
pub struct Lifecycle {
    messenger: Arc<dyn Messenger>,
    webhook_url: Option<String>,
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new(messenger: Arc<dyn Messenger>, webhook_url: Option<String>) -> Self {
        Self {
            messenger,
            webhook_url,
            state: LifecycleState::Stopped,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Initialize the client and register the webhook. A failed registration
    /// is logged and the lifecycle still reaches `Running`.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != LifecycleState::Stopped {
            bail!("cannot start from {:?}", self.state);
        }
        self.state = LifecycleState::Starting;

        let ready = async {
            self.messenger
                .initialize()
                .await
                .context("Failed to initialize messaging client")?;
            self.messenger
                .start()
                .await
                .context("Failed to start messaging client")
        }
        .await;
        if let Err(e) = ready {
            self.state = LifecycleState::Stopped;
            return Err(e);
        }

        match &self.webhook_url {
            Some(url) => match self.messenger.set_webhook(url, true).await {
                Ok(()) => info!("Webhook set: {}", redact_token(url)),
                Err(e) => error!("Failed to set webhook: {:#}", e),
            },
            None => info!("BASE_URL not set; skipping set_webhook"),
        }

        self.state = LifecycleState::Running;
        Ok(())
    }

    /// Best-effort webhook removal, then release the client.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state != LifecycleState::Running {
            bail!("cannot stop from {:?}", self.state);
        }
        self.state = LifecycleState::Stopping;

        if let Err(e) = self.messenger.delete_webhook(false).await {
            debug!("Ignoring deleteWebhook failure: {:#}", e);
        }

        let result = async {
            self.messenger
                .stop()
                .await
                .context("Failed to stop messaging client")?;
            self.messenger
                .shutdown()
                .await
                .context("Failed to shut down messaging client")
        }
        .await;

        self.state = LifecycleState::Stopped;
        info!("Lifecycle stopped");
        result
    }
}

/// Mask the token path segment of a webhook URL for logging.
fn redact_token(url: &str) -> String {
    match url.rfind("/webhook/") {
        Some(pos) => format!("{}/webhook/***", &url[..pos]),
        None => url.to_string(),
    }
}

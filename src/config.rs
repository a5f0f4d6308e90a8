use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Externally reachable base URL, e.g. `https://ledybot.onrender.com`.
    /// Webhook auto-registration is skipped when unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Deployed commit id, reported by `/version`.
    #[serde(default = "default_commit")]
    pub commit: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_bot_name() -> String {
    "LEDYBOT".to_string()
}

fn default_commit() -> String {
    "dev".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            commit: default_commit(),
        }
    }
}

impl Config {
    /// Load `path` if it exists, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)?
        } else {
            Self::from_toml("")?
        };

        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Apply `BOT_TOKEN`, `BASE_URL`, `HOST`, `PORT`, `COMMIT_HASH` and
    /// `BOT_NAME` from `lookup`, normalize, and validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(base_url) = lookup("BASE_URL") {
            self.telegram.base_url = Some(base_url);
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {:?}", port))?;
        }
        if let Some(commit) = lookup("COMMIT_HASH") {
            self.general.commit = commit;
        }
        if let Some(name) = lookup("BOT_NAME") {
            self.general.bot_name = name;
        }

        self.telegram.bot_token = self.telegram.bot_token.trim().to_string();
        self.telegram.base_url = self
            .telegram
            .base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self.server.host = self.server.host.trim().to_string();
        self.general.commit = self.general.commit.trim().to_string();
        self.general.bot_name = self.general.bot_name.trim().to_string();

        if self.telegram.bot_token.is_empty() {
            bail!("BOT_TOKEN is required");
        }

        Ok(self)
    }

    /// `{base_url}/webhook/{token}`, or `None` when no base URL is configured.
    pub fn webhook_url(&self) -> Option<String> {
        self.telegram.base_url.as_ref().map(|base| {
            format!(
                "{}/webhook/{}",
                base.trim_end_matches('/'),
                self.telegram.bot_token
            )
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! LEDYBOT setup wizard.
//!
//! Prompts for the webhook settings in the terminal and writes `config.toml`
//! to the project root (`$LEDYBOT_ROOT`, default `.`). With `--print` the
//! generated file goes to stdout instead.
//!
//! Environment variables still override the file at runtime, so the token can
//! be left out here and supplied as `BOT_TOKEN` on the host.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

// ── Config formatting ──────────────────────────────────────────────────────────

struct ConfigParams<'a> {
    bot_token: &'a str,
    base_url: &'a str,
    host: &'a str,
    port: u16,
    bot_name: &'a str,
    commit: &'a str,
}

#[derive(Serialize)]
struct SetupFile<'a> {
    telegram: TelegramSection<'a>,
    server: ServerSection<'a>,
    general: GeneralSection<'a>,
}

#[derive(Serialize)]
struct TelegramSection<'a> {
    bot_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<&'a str>,
}

#[derive(Serialize)]
struct ServerSection<'a> {
    host: &'a str,
    port: u16,
}

#[derive(Serialize)]
struct GeneralSection<'a> {
    bot_name: &'a str,
    commit: &'a str,
}

/// Produces a valid config.toml string. Extracted so it can be unit-tested.
fn format_config(p: &ConfigParams<'_>) -> Result<String> {
    let base_url = p.base_url.trim_end_matches('/');
    let file = SetupFile {
        telegram: TelegramSection {
            bot_token: p.bot_token,
            base_url: (!base_url.is_empty()).then_some(base_url),
        },
        server: ServerSection {
            host: p.host,
            port: p.port,
        },
        general: GeneralSection {
            bot_name: p.bot_name,
            commit: p.commit,
        },
    };

    let out = toml::to_string(&file).context("Failed to serialize config")?;
    if file.telegram.base_url.is_some() {
        return Ok(out);
    }
    Ok(out.replacen(
        "[telegram]\n",
        "[telegram]\n# base_url = \"https://your-service.example\"\n",
        1,
    ))
}

// ── Prompts ────────────────────────────────────────────────────────────────────

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_owned())
}

fn or_default(s: String, default: &str) -> String {
    if s.is_empty() {
        default.to_owned()
    } else {
        s
    }
}

fn prompt_config() -> Result<String> {
    println!("=== LEDYBOT Setup ===\n");

    let bot_token = read_line("Telegram bot token (empty to use BOT_TOKEN at runtime): ")?;
    let base_url = read_line("Public base URL (optional, e.g. https://ledybot.onrender.com): ")?;
    let host = or_default(read_line("Listen host [0.0.0.0]: ")?, "0.0.0.0");
    let port = or_default(read_line("Listen port [8000]: ")?, "8000");
    let port: u16 = port
        .parse()
        .with_context(|| format!("Invalid port: {port}"))?;
    let bot_name = or_default(read_line("Bot name [LEDYBOT]: ")?, "LEDYBOT");
    let commit = or_default(read_line("Commit id [dev]: ")?, "dev");

    format_config(&ConfigParams {
        bot_token: &bot_token,
        base_url: &base_url,
        host: &host,
        port,
        bot_name: &bot_name,
        commit: &commit,
    })
}

// ── Entry point ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let print_only = std::env::args().any(|a| a == "--print");

    let config = prompt_config()?;

    if print_only {
        println!("\n{config}");
        return Ok(());
    }

    let project_root =
        PathBuf::from(std::env::var("LEDYBOT_ROOT").unwrap_or_else(|_| ".".to_string()));
    let config_path = project_root.join("config.toml");
    std::fs::write(&config_path, &config)
        .with_context(|| format!("Could not write {}", config_path.display()))?;

    println!("\n✓  config.toml saved to {}", config_path.display());
    println!("   Run the bot with:  cargo run");
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

// Process configuration, read from the environment (and `.env` if present).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    /// Application id; only the registrar needs it
    pub client_id: Option<u64>,
    /// When set, commands are registered/cleared in this guild only
    pub guild_id: Option<u64>,
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .context("DISCORD_TOKEN environment variable not set")?;

        let client_id = parse_id(&lookup, "CLIENT_ID")?;
        let guild_id = parse_id(&lookup, "GUILD_ID")?;

        let data_dir = lookup("DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
            .into();

        Ok(Self {
            discord_token,
            client_id,
            guild_id,
            data_dir,
        })
    }

    pub fn require_client_id(&self) -> Result<u64> {
        self.client_id
            .context("CLIENT_ID environment variable not set")
    }
}

fn parse_id(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => {
            let id = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a numeric Discord id, got {:?}", key, raw))?;
            if id == 0 {
                anyhow::bail!("{} must be a non-zero Discord id", key);
            }
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

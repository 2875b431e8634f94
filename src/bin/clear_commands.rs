// Removes every registered slash command, globally or in GUILD_ID.

use anyhow::Context;
use starboard_bot::config::BotConfig;
use starboard_bot::discord::registrar::{self, CommandScope};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BotConfig::from_env()?;
    let http = registrar::http_client(&config.discord_token, config.require_client_id()?);
    let scope = CommandScope::from_guild_id(config.guild_id);

    registrar::clear(&http, scope)
        .await
        .with_context(|| format!("Failed to clear {} commands", scope))?;

    tracing::info!(%scope, "Commands cleared");
    Ok(())
}

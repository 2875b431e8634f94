// Publishes the bot's slash commands.
//
// Registers globally, or in GUILD_ID only when it is set (guild commands
// update instantly, global ones can take a while to propagate).

use anyhow::Context;
use starboard_bot::config::BotConfig;
use starboard_bot::discord::registrar::{self, CommandScope};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = BotConfig::from_env()?;
    let http = registrar::http_client(&config.discord_token, config.require_client_id()?);
    let scope = CommandScope::from_guild_id(config.guild_id);

    let count = registrar::register(&http, scope)
        .await
        .with_context(|| format!("Failed to register {} commands", scope))?;

    tracing::info!(%scope, count, "Commands registered");
    Ok(())
}

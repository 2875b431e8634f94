// This is the entry point of the Discord bot.
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Route gateway events to their handlers
//
// Slash commands are published out-of-band with `register_commands`.

use poise::serenity_prelude as serenity;
use starboard_bot::config::BotConfig;
use starboard_bot::core::moderation::WarnService;
use starboard_bot::core::starboard::StarboardService;
use starboard_bot::discord::starboard::events as starboard_events;
use starboard_bot::discord::{commands, errors, Data, Error};
use starboard_bot::infra::moderation::JsonWarningStore;
use starboard_bot::infra::starboard::JsonStarboardStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = starboard_events::handle_message(ctx, data, new_message).await {
                tracing::error!(message_id = %new_message.id, "Error handling starboard message: {}", e);
            }
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            if let Err(e) = starboard_events::handle_reaction_add(ctx, data, add_reaction).await {
                tracing::error!(message_id = %add_reaction.message_id, "Error handling starboard reaction: {}", e);
            }
        }
        serenity::FullEvent::MessageDelete {
            deleted_message_id, ..
        } => {
            let deleted = [*deleted_message_id];
            if let Err(e) = starboard_events::handle_messages_deleted(ctx, data, &deleted).await {
                tracing::error!(message_id = %deleted_message_id, "Error cleaning up starboard repost: {}", e);
            }
        }
        serenity::FullEvent::MessageDeleteBulk {
            multiple_deleted_messages_ids,
            ..
        } => {
            if let Err(e) =
                starboard_events::handle_messages_deleted(ctx, data, multiple_deleted_messages_ids)
                    .await
            {
                tracing::error!(
                    count = multiple_deleted_messages_ids.len(),
                    "Error cleaning up starboard reposts: {}",
                    e
                );
            }
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let starboard_store = JsonStarboardStore::new(&config.data_dir);
    let starboard_service = Arc::new(StarboardService::new(starboard_store).await?);

    let warning_store = JsonWarningStore::new(&config.data_dir);
    let warn_service = Arc::new(WarnService::new(warning_store));

    let data = Data {
        starboard: Arc::clone(&starboard_service),
        warnings: Arc::clone(&warn_service),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::catalog(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(errors::on_error(error)),
            ..Default::default()
        })
        .setup(|_ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(
                    user = %ready.user.name,
                    guilds = ready.guilds.len(),
                    commands = framework.options().commands.len(),
                    "Bot is ready"
                );
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

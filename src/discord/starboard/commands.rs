// Starboard slash command for configuration.

use crate::core::starboard::{parse_channel_ids, StarboardConfig, StarboardError};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Configure the starboard for this server.
///
/// Replaces any previous starboard settings for the server.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn starboard(
    ctx: Context<'_>,
    #[description = "Channels to watch (mentions or ids, separated by spaces)"] channels: String,
    #[description = "Emoji to react with and count"] emoji: String,
    #[description = "Only react to messages that have attachments"]
    only_attachments: Option<bool>,
    #[description = "Open a discussion thread on each starred message"]
    auto_thread: Option<bool>,
    #[description = "Channel to repost popular messages to"]
    #[channel_types("Text")]
    hall_of_fame: Option<serenity::GuildChannel>,
    #[description = "Reactions needed before a message is reposted"]
    #[min = 1]
    threshold: Option<u64>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;

    let guild_channels = guild_id.channels(ctx.http()).await?;
    let channel_ids = resolve_text_channels(&channels, |id| {
        guild_channels
            .get(&serenity::ChannelId::new(id))
            .map_or(false, |c| c.kind == serenity::ChannelType::Text)
    });

    if channel_ids.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .content("❌ None of those are text channels in this server.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let emoji = normalize_emoji(&emoji);

    let config = StarboardConfig {
        guild_id: guild_id.get(),
        channel_ids,
        emoji,
        only_attachments: only_attachments.unwrap_or(false),
        auto_thread: auto_thread.unwrap_or(false),
        hall_of_fame_channel_id: hall_of_fame.map(|c| c.id.get()),
        threshold,
    };

    match ctx.data().starboard.configure(config.clone()).await {
        Ok(()) => {}
        Err(StarboardError::InvalidConfig(reason)) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("❌ {}", reason))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        guild_id = config.guild_id,
        channels = config.channel_ids.len(),
        "Starboard configured"
    );

    ctx.send(poise::CreateReply::default().embed(summary_embed(&config)))
        .await?;
    Ok(())
}

/// Channel ids from `input` that `is_text_channel` accepts, in input order.
fn resolve_text_channels(input: &str, is_text_channel: impl Fn(u64) -> bool) -> Vec<u64> {
    parse_channel_ids(input)
        .into_iter()
        .filter(|id| is_text_channel(*id))
        .collect()
}

/// Store emoji in the same form reactions display in, so `<:name:id>` and
/// unicode both compare by plain string equality later.
fn normalize_emoji(input: &str) -> String {
    let trimmed = input.trim();
    match trimmed.parse::<serenity::ReactionType>() {
        Ok(reaction) => reaction.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

fn summary_embed(config: &StarboardConfig) -> serenity::CreateEmbed {
    let channels = config
        .channel_ids
        .iter()
        .map(|id| format!("<#{}>", id))
        .collect::<Vec<_>>()
        .join(", ");

    let hall_of_fame = match config.hall_of_fame() {
        Some((channel_id, threshold)) => format!("<#{}> at {} reactions", channel_id, threshold),
        None => "Disabled".to_string(),
    };

    let yes_no = |flag: bool| if flag { "✅ Yes" } else { "❌ No" };

    serenity::CreateEmbed::new()
        .title("⭐ Starboard Configured")
        .color(0xF1C40F)
        .field("Channels", channels, false)
        .field("Emoji", config.emoji.clone(), true)
        .field("Attachments only", yes_no(config.only_attachments), true)
        .field("Auto thread", yes_no(config.auto_thread), true)
        .field("Hall of Fame", hall_of_fame, false)
}

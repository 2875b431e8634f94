// Discord-specific starboard handling - translates core plans to Discord actions.
//
// Reacting, threading and repost cleanup are best-effort: failures are logged
// and the handler moves on. Only the Hall of Fame repost propagates errors to
// the caller.

use crate::core::starboard::{
    thread_name, MessageSnapshot, PostedMessage, Promotion, ReactionSnapshot,
};
use crate::discord::starboard::hall_of_fame;
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

/// React to (and optionally thread) a new message in a monitored channel.
pub async fn handle_message(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let snapshot = MessageSnapshot {
        guild_id: message.guild_id.map(|id| id.get()),
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
        author_is_bot: message.author.bot,
        has_attachments: !message.attachments.is_empty(),
    };

    let plan = data.starboard.plan_for_message(&snapshot).await?;

    if let Some(emoji) = plan.react_with {
        react(ctx, message, &emoji).await;
    }
    if plan.create_thread {
        create_thread(ctx, message).await;
    }

    Ok(())
}

/// Thread and promote messages as reactions come in.
pub async fn handle_reaction_add(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<(), Error> {
    let Some(guild_id) = reaction.guild_id else {
        return Ok(());
    };
    let emoji = reaction.emoji.to_string();

    // Settle what the event ids alone can before any REST call.
    let watched = data
        .starboard
        .watches_reaction(guild_id.get(), reaction.channel_id.get(), &emoji)
        .await?;
    if !watched {
        return Ok(());
    }

    let Some(reactor_is_bot) = reactor_is_bot(ctx, reaction).await else {
        return Ok(());
    };
    if reactor_is_bot {
        return Ok(());
    }

    // Reaction events only carry ids; fetch the full message for counts.
    let message = match reaction.message(&ctx.http).await {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(message_id = %reaction.message_id, "Could not fetch reacted message: {}", e);
            return Ok(());
        }
    };

    let reaction_count = count_for(
        message.reactions.iter().map(|r| (&r.reaction_type, r.count)),
        &emoji,
    );

    let snapshot = ReactionSnapshot {
        guild_id: Some(guild_id.get()),
        channel_id: reaction.channel_id.get(),
        message_id: reaction.message_id.get(),
        emoji,
        reactor_is_bot,
        reaction_count,
        has_attachments: !message.attachments.is_empty(),
        has_thread: message.thread.is_some(),
    };

    let plan = data.starboard.plan_for_reaction(&snapshot).await?;

    if plan.create_thread {
        create_thread(ctx, &message).await;
    }

    if let Some(promotion) = plan.promote {
        promote(ctx, data, &message, guild_id.get(), &promotion).await?;
    }

    Ok(())
}

/// Take down Hall of Fame reposts of deleted messages, single or bulk.
pub async fn handle_messages_deleted(
    ctx: &serenity::Context,
    data: &Data,
    message_ids: &[serenity::MessageId],
) -> Result<(), Error> {
    let ids: Vec<u64> = message_ids.iter().map(|id| id.get()).collect();

    for posted in data.starboard.forget_deleted(&ids).await? {
        tracing::info!(message_id = posted.message_id, "Promoted message deleted");

        let Some((channel_id, repost_id)) = posted.repost() else {
            continue;
        };
        if let Err(e) = serenity::ChannelId::new(channel_id)
            .delete_message(&ctx.http, serenity::MessageId::new(repost_id))
            .await
        {
            tracing::warn!(repost_id, "Failed to delete Hall of Fame repost: {}", e);
        }
    }

    Ok(())
}

/// Count for the reaction whose display form equals `emoji`.
fn count_for<'a>(
    reactions: impl IntoIterator<Item = (&'a serenity::ReactionType, u64)>,
    emoji: &str,
) -> u64 {
    reactions
        .into_iter()
        .find(|(reaction_type, _)| reaction_type.to_string() == emoji)
        .map(|(_, count)| count)
        .unwrap_or(0)
}

/// `None` when the reacting user can't be resolved at all.
async fn reactor_is_bot(ctx: &serenity::Context, reaction: &serenity::Reaction) -> Option<bool> {
    if let Some(member) = &reaction.member {
        return Some(member.user.bot);
    }

    match reaction.user(ctx).await {
        Ok(user) => Some(user.bot),
        Err(e) => {
            tracing::debug!(message_id = %reaction.message_id, "Could not fetch reacting user: {}", e);
            None
        }
    }
}

async fn react(ctx: &serenity::Context, message: &serenity::Message, emoji: &str) {
    let reaction = match emoji.parse::<serenity::ReactionType>() {
        Ok(reaction) => reaction,
        Err(e) => {
            tracing::warn!(emoji, "Configured starboard emoji is not usable: {}", e);
            return;
        }
    };

    if let Err(e) = message.react(&ctx.http, reaction).await {
        tracing::warn!(message_id = %message.id, "Failed to add starboard reaction: {}", e);
    }
}

async fn create_thread(ctx: &serenity::Context, message: &serenity::Message) {
    let name = thread_name(&message.author.name, &message.content);

    if let Err(e) = message
        .channel_id
        .create_thread_from_message(&ctx.http, message.id, serenity::CreateThread::new(name))
        .await
    {
        tracing::warn!(message_id = %message.id, "Failed to create starboard thread: {}", e);
    }
}

async fn promote(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
    guild_id: u64,
    promotion: &Promotion,
) -> Result<(), Error> {
    let message_id = message.id.get();
    if !data.starboard.claim_promotion(message_id) {
        return Ok(());
    }

    let destination = serenity::ChannelId::new(promotion.hall_of_fame_channel_id);
    let channel = match destination.to_channel(ctx).await {
        Ok(serenity::Channel::Guild(channel)) if channel.kind == serenity::ChannelType::Text => {
            channel
        }
        Ok(_) => {
            tracing::warn!(channel_id = %destination, "Hall of Fame channel is not a text channel");
            data.starboard.release_promotion(message_id);
            return Ok(());
        }
        Err(e) => {
            tracing::warn!(channel_id = %destination, "Could not resolve Hall of Fame channel: {}", e);
            data.starboard.release_promotion(message_id);
            return Ok(());
        }
    };

    let embed = hall_of_fame::build_embed(message, guild_id, promotion);
    let repost = match channel
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(repost) => repost,
        Err(e) => {
            data.starboard.release_promotion(message_id);
            return Err(e.into());
        }
    };

    tracing::info!(
        guild_id,
        message_id,
        count = promotion.reaction_count,
        "Message promoted to Hall of Fame"
    );

    data.starboard
        .confirm_promotion(PostedMessage {
            message_id,
            repost_channel_id: Some(channel.id.get()),
            repost_id: Some(repost.id.get()),
        })
        .await?;
    Ok(())
}

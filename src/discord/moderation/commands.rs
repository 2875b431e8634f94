// Moderation slash commands: issuing and reviewing warnings.

use crate::core::moderation::{WarnError, WarnRequest, WarnTarget, Warning};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

// Oldest entries beyond this are summarized as a count.
const MAX_LISTED_WARNINGS: usize = 10;

/// Warn a member. Requires the Staff role.
#[poise::command(slash_command, guild_only)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Member to warn"] user: serenity::User,
    #[description = "Reason for the warning"] reason: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let staff_role_names = author_role_names(ctx, guild_id).await?;
    let is_member = guild_id.member(ctx, user.id).await.is_ok();

    let request = WarnRequest {
        guild_id: guild_id.get(),
        staff_id: ctx.author().id.get(),
        staff_role_names: staff_role_names.clone(),
        target: WarnTarget {
            user_id: user.id.get(),
            is_bot: user.bot,
            is_member,
        },
        reason,
    };

    let warning = match ctx.data().warnings.warn(request).await {
        Ok(warning) => warning,
        Err(e) if e.is_user_facing() => {
            reply_rejected(ctx, &e).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let total = ctx
        .data()
        .warnings
        .history(guild_id.get(), user.id.get(), &staff_role_names)
        .await
        .map(|h| h.count())
        .unwrap_or(1);

    let guild_name = ctx
        .guild()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "the server".to_string());

    // Initial response. No defer, so error replies stay ephemeral.
    ctx.send(summary_reply(&warning, total)).await?;

    let dm_delivered = match user
        .direct_message(
            ctx,
            serenity::CreateMessage::new().embed(dm_embed(&warning, &guild_name)),
        )
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(user_id = %user.id, case_id = %warning.case_id, "Could not DM warned user: {}", e);
            false
        }
    };

    if !dm_delivered {
        ctx.send(dm_failure_note(user.id.get())).await?;
    }

    Ok(())
}

/// List a member's warnings. Requires the Staff role.
#[poise::command(slash_command, guild_only)]
pub async fn warnings(
    ctx: Context<'_>,
    #[description = "Member to look up"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be used in a server")?;
    let staff_role_names = author_role_names(ctx, guild_id).await?;

    let history = match ctx
        .data()
        .warnings
        .history(guild_id.get(), user.id.get(), &staff_role_names)
        .await
    {
        Ok(history) => history,
        Err(e) if e.is_user_facing() => {
            reply_rejected(ctx, &e).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("⚠️ Warnings for {}", user.name))
        .color(0xE67E22)
        .thumbnail(user.face());

    if history.warnings.is_empty() {
        embed = embed.description("No warnings on record.");
    } else {
        embed = embed.description(format!("**{}** warning(s) on record.", history.count()));

        let skipped = history.count().saturating_sub(MAX_LISTED_WARNINGS);
        for warning in history.warnings.iter().skip(skipped) {
            embed = embed.field(
                format!("Case {}", warning.case_id),
                format!(
                    "{}\nBy <@{}> <t:{}:R>",
                    warning.reason,
                    warning.staff_id,
                    warning.timestamp.timestamp()
                ),
                false,
            );
        }
        if skipped > 0 {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "{} older warning(s) not shown",
                skipped
            )));
        }
    }

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Names of every role the invoking member holds.
async fn author_role_names(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
) -> Result<Vec<String>, Error> {
    let member = ctx
        .author_member()
        .await
        .ok_or("Could not resolve your server membership")?;
    let role_ids = member.roles.clone();

    // Prefer the cache, fall back to HTTP when the guild isn't cached.
    let cached = ctx.guild().map(|guild| {
        role_ids
            .iter()
            .filter_map(|id| guild.roles.get(id).map(|role| role.name.clone()))
            .collect::<Vec<_>>()
    });

    if let Some(names) = cached {
        return Ok(names);
    }

    let roles = guild_id.roles(ctx.http()).await?;
    Ok(role_ids
        .iter()
        .filter_map(|id| roles.get(id).map(|role| role.name.clone()))
        .collect())
}

async fn reply_rejected(ctx: Context<'_>, error: &WarnError) -> Result<(), Error> {
    let message = match error {
        WarnError::MissingStaffRole => "❌ You need the **Staff** role to use this command.".to_string(),
        WarnError::InvalidTarget(reason) => format!("❌ Invalid target: {}.", reason),
        other => format!("❌ {}", other),
    };

    ctx.send(poise::CreateReply::default().content(message).ephemeral(true))
        .await?;
    Ok(())
}

fn summary_reply(warning: &Warning, total: usize) -> poise::CreateReply {
    poise::CreateReply::default().embed(summary_embed(warning, total))
}

fn dm_failure_note(user_id: u64) -> poise::CreateReply {
    poise::CreateReply::default()
        .content(format!(
            "Note: could not DM <@{}> about this warning.",
            user_id
        ))
        .ephemeral(true)
}

fn summary_embed(warning: &Warning, total: usize) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("⚠️ Member Warned")
        .color(0xE67E22)
        .description(format!("<@{}> has been warned.", warning.user_id))
        .field("Reason", warning.reason.clone(), false)
        .field("Staff", format!("<@{}>", warning.staff_id), true)
        .field("Case ID", format!("`{}`", warning.case_id), true)
        .field("Total warnings", total.to_string(), true)
        .timestamp(to_timestamp(warning))
}

fn dm_embed(warning: &Warning, guild_name: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("⚠️ You were warned in {}", guild_name))
        .color(0xE67E22)
        .field("Reason", warning.reason.clone(), false)
        .field("Case ID", format!("`{}`", warning.case_id), true)
        .timestamp(to_timestamp(warning))
}

fn to_timestamp(warning: &Warning) -> serenity::Timestamp {
    serenity::Timestamp::from_unix_timestamp(warning.timestamp.timestamp())
        .unwrap_or_else(|_| serenity::Timestamp::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn warning() -> Warning {
        Warning {
            case_id: "AB12CD34".to_string(),
            guild_id: Some(1),
            user_id: 2,
            staff_id: 3,
            reason: "spam".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summary_is_public() {
        let reply = summary_reply(&warning(), 2);

        assert_ne!(reply.ephemeral, Some(true));
        assert_eq!(reply.embeds.len(), 1);
    }

    #[test]
    fn dm_failure_note_is_only_for_the_caller() {
        let reply = dm_failure_note(2);

        assert_eq!(reply.ephemeral, Some(true));
        assert_eq!(
            reply.content.as_deref(),
            Some("Note: could not DM <@2> about this warning.")
        );
    }
}

use crate::discord::{Context, Error};
use std::time::Instant;

/// Check that the bot is alive and how fast it answers.
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("🏓 Pinging...").await?;
    let round_trip = started.elapsed().as_millis();

    let gateway = ctx.ping().await.as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!(
                "🏓 Pong! Round trip: **{}ms** | Gateway: **{}ms**",
                round_trip, gateway
            )),
        )
        .await?;

    Ok(())
}

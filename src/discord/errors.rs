// Top-level error hook for the poise framework.
//
// Command failures are logged and answered with a generic ephemeral message;
// the user never sees internal error text.

use crate::discord::{Data, Error};

const GENERIC_FAILURE: &str = "❌ There was an error while executing this command.";

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                user_id = %ctx.author().id,
                "Command error: {:?}",
                error
            );
            reply_ephemeral(ctx, GENERIC_FAILURE).await;
        }
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            let message = match missing_permissions {
                Some(permissions) => format!(
                    "❌ You need the following permission(s) to use this command: {}",
                    permissions
                ),
                None => "❌ Could not verify your permissions for this command.".to_string(),
            };
            reply_ephemeral(ctx, &message).await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            reply_ephemeral(ctx, "❌ This command only works in servers.").await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling framework error: {}", e);
            }
        }
    }
}

async fn reply_ephemeral(ctx: poise::Context<'_, Data, Error>, content: &str) {
    let reply = poise::CreateReply::default()
        .content(content)
        .ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        tracing::error!("Failed to send error reply: {}", e);
    }
}

// Discord commands module.
//
// The catalog is the single list of commands the bot serves and the
// registrar publishes. Add new commands here.

use crate::discord::{moderation, starboard, Data, Error};
use std::collections::HashSet;

pub mod ping;

/// Every command the bot exposes, in registration order.
pub fn catalog() -> Vec<poise::Command<Data, Error>> {
    dedupe(vec![
        ping::ping(),
        starboard::commands::starboard(),
        moderation::commands::warn(),
        moderation::commands::warnings(),
    ])
}

/// Drop nameless commands and later commands reusing an earlier name.
fn dedupe(commands: Vec<poise::Command<Data, Error>>) -> Vec<poise::Command<Data, Error>> {
    let mut seen = HashSet::new();
    commands
        .into_iter()
        .filter(|command| {
            if command.name.trim().is_empty() {
                tracing::warn!("Skipping command without a name");
                return false;
            }
            if !seen.insert(command.name.clone()) {
                tracing::warn!(command = %command.name, "Skipping duplicate command");
                return false;
            }
            true
        })
        .collect()
}

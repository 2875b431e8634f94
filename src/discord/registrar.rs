// Out-of-band slash command publishing.
//
// Both operations are a single bulk replace (HTTP PUT) of the application's
// command list, either globally or for one guild.

use crate::discord::commands::catalog;
use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    Global,
    Guild(u64),
}

impl CommandScope {
    pub fn from_guild_id(guild_id: Option<u64>) -> Self {
        match guild_id {
            Some(id) => CommandScope::Guild(id),
            None => CommandScope::Global,
        }
    }
}

impl std::fmt::Display for CommandScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandScope::Global => write!(f, "global"),
            CommandScope::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

/// HTTP client bound to an application, as the command endpoints require.
pub fn http_client(token: &str, client_id: u64) -> serenity::Http {
    let http = serenity::Http::new(token);
    http.set_application_id(serenity::ApplicationId::new(client_id));
    http
}

/// Wire payload for every command in the catalog.
pub fn command_payload() -> Vec<serenity::CreateCommand> {
    poise::builtins::create_application_commands(&catalog())
}

/// Replace the registered commands with the catalog. Returns how many
/// commands Discord now holds for `scope`.
pub async fn register(
    http: &serenity::Http,
    scope: CommandScope,
) -> Result<usize, serenity::Error> {
    put_commands(http, scope, command_payload()).await
}

/// Remove every registered command for `scope`.
pub async fn clear(http: &serenity::Http, scope: CommandScope) -> Result<usize, serenity::Error> {
    put_commands(http, scope, Vec::new()).await
}

async fn put_commands(
    http: &serenity::Http,
    scope: CommandScope,
    payload: Vec<serenity::CreateCommand>,
) -> Result<usize, serenity::Error> {
    let count = payload.len();
    tracing::info!(%scope, count, "Replacing application commands");

    let registered = match scope {
        CommandScope::Global => serenity::Command::set_global_commands(http, payload).await?,
        CommandScope::Guild(id) => serenity::GuildId::new(id).set_commands(http, payload).await?,
    };

    Ok(registered.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_follows_guild_id() {
        assert_eq!(CommandScope::from_guild_id(None), CommandScope::Global);
        assert_eq!(CommandScope::from_guild_id(Some(7)), CommandScope::Guild(7));
        assert_eq!(CommandScope::Guild(7).to_string(), "guild 7");
    }

    #[test]
    fn payload_matches_command_surface() {
        let payload = serde_json::to_value(command_payload()).unwrap();
        let commands = payload.as_array().unwrap();

        let names: Vec<&str> = commands
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["ping", "starboard", "warn", "warnings"]);

        let starboard = &commands[1];
        let options: Vec<(&str, bool)> = starboard["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| (o["name"].as_str().unwrap(), o["required"].as_bool().unwrap_or(false)))
            .collect();
        assert_eq!(
            options,
            vec![
                ("channels", true),
                ("emoji", true),
                ("only_attachments", false),
                ("auto_thread", false),
                ("hall_of_fame", false),
                ("threshold", false),
            ]
        );

        let threshold = &starboard["options"][5];
        assert_eq!(threshold["min_value"].as_f64(), Some(1.0));

        let warn = &commands[2];
        let warn_options: Vec<&str> = warn["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(warn_options, vec!["user", "reason"]);
    }
}

// Starboard and moderation bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON files)
// - `discord/` = Discord-specific adapters (commands, events, registration)
//
// The bot process lives in `main.rs`; `bin/` holds the one-shot command
// registration tools. All of them share this library.

pub mod config;

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "discord/discord_layer.rs"]
pub mod discord;
#[path = "infra/infra_layer.rs"]
pub mod infra;

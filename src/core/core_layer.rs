// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "moderation/mod.rs"]
pub mod moderation;

pub mod snowflake;

#[path = "starboard/mod.rs"]
pub mod starboard;

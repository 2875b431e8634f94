// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

pub mod json_file;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "starboard/mod.rs"]
pub mod starboard;

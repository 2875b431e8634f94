// Discord layer - commands and event handlers.
//
// Everything here adapts Discord types into the primitives expected by the
// core and turns core results back into Discord actions.

use crate::core::moderation::WarnService;
use crate::core::starboard::StarboardService;
use crate::infra::moderation::JsonWarningStore;
use crate::infra::starboard::JsonStarboardStore;
use std::sync::Arc;

#[path = "commands/command_catalog.rs"]
pub mod commands;

pub mod errors;

#[path = "moderation/mod.rs"]
pub mod moderation;

pub mod registrar;

#[path = "starboard/mod.rs"]
pub mod starboard;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Process state shared by every command and event handler.
pub struct Data {
    pub starboard: Arc<StarboardService<JsonStarboardStore>>,
    pub warnings: Arc<WarnService<JsonWarningStore>>,
}

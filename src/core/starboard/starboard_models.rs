// Starboard domain models.
//
// These are pure domain types with no Discord dependencies. The Discord layer
// projects messages and reactions into snapshots and executes the plans the
// service hands back.

use serde::{Deserialize, Serialize};

/// Per-guild starboard settings. One record per guild in `starboard.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarboardConfig {
    #[serde(with = "crate::core::snowflake")]
    pub guild_id: u64,
    /// Channels whose messages take part in the starboard
    #[serde(with = "crate::core::snowflake::vec")]
    pub channel_ids: Vec<u64>,
    /// Compared by exact string match against the reaction's display form
    pub emoji: String,
    #[serde(default)]
    pub only_attachments: bool,
    #[serde(default)]
    pub auto_thread: bool,
    #[serde(
        default,
        with = "crate::core::snowflake::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub hall_of_fame_channel_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,
}

impl StarboardConfig {
    pub fn monitors(&self, channel_id: u64) -> bool {
        self.channel_ids.contains(&channel_id)
    }

    /// Hall of Fame needs both a destination and a threshold to be active.
    pub fn hall_of_fame(&self) -> Option<(u64, u64)> {
        match (self.hall_of_fame_channel_id, self.threshold) {
            (Some(channel_id), Some(threshold)) if channel_id != 0 && threshold > 0 => {
                Some((channel_id, threshold))
            }
            _ => None,
        }
    }
}

/// A source message that made it to the Hall of Fame.
///
/// Entries written before reposts were tracked only carry the message id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedMessage {
    #[serde(with = "crate::core::snowflake")]
    pub message_id: u64,
    #[serde(
        default,
        with = "crate::core::snowflake::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub repost_channel_id: Option<u64>,
    #[serde(
        default,
        with = "crate::core::snowflake::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub repost_id: Option<u64>,
}

impl PostedMessage {
    pub fn untracked(message_id: u64) -> Self {
        Self {
            message_id,
            repost_channel_id: None,
            repost_id: None,
        }
    }

    /// `(channel_id, message_id)` of the Hall of Fame repost, when known.
    pub fn repost(&self) -> Option<(u64, u64)> {
        match (self.repost_channel_id, self.repost_id) {
            (Some(channel_id), Some(repost_id)) if channel_id != 0 && repost_id != 0 => {
                Some((channel_id, repost_id))
            }
            _ => None,
        }
    }
}

/// What the starboard needs to know about a freshly created message.
#[derive(Debug, Clone)]
pub struct MessageSnapshot {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub author_is_bot: bool,
    pub has_attachments: bool,
}

/// What the starboard needs to know about a reaction and its (fetched) message.
#[derive(Debug, Clone)]
pub struct ReactionSnapshot {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    /// Display form of the emoji, e.g. `⭐` or `<:name:id>`
    pub emoji: String,
    pub reactor_is_bot: bool,
    /// Current count for `emoji` on the message
    pub reaction_count: u64,
    pub has_attachments: bool,
    pub has_thread: bool,
}

/// Side effects to attempt for a new message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePlan {
    pub react_with: Option<String>,
    pub create_thread: bool,
}

impl MessagePlan {
    pub fn is_empty(&self) -> bool {
        self.react_with.is_none() && !self.create_thread
    }
}

/// A message that crossed the Hall of Fame threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    pub hall_of_fame_channel_id: u64,
    pub emoji: String,
    pub reaction_count: u64,
}

/// Side effects to attempt for a reaction-add.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionPlan {
    pub create_thread: bool,
    pub promote: Option<Promotion>,
}

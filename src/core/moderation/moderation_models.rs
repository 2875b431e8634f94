// Moderation domain models - data structures for the warn system.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer will convert these to Discord-specific actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a member must hold (by name) to issue or read warnings.
pub const STAFF_ROLE_NAME: &str = "Staff";

/// One moderation warning, as stored in `warnings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    /// Short random base-36 id; not checked for collisions
    pub case_id: String,
    /// Absent on records written before warnings were guild-scoped
    #[serde(
        default,
        with = "crate::core::snowflake::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub guild_id: Option<u64>,
    #[serde(with = "crate::core::snowflake")]
    pub user_id: u64,
    #[serde(with = "crate::core::snowflake")]
    pub staff_id: u64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// The member being warned, as seen by the Discord layer.
#[derive(Debug, Clone)]
pub struct WarnTarget {
    pub user_id: u64,
    pub is_bot: bool,
    /// Whether the user could be resolved as a member of the guild
    pub is_member: bool,
}

/// Everything needed to issue a warning.
#[derive(Debug, Clone)]
pub struct WarnRequest {
    pub guild_id: u64,
    pub staff_id: u64,
    /// Names of every role the issuing member holds
    pub staff_role_names: Vec<String>,
    pub target: WarnTarget,
    pub reason: String,
}

/// A user's warnings within one guild, oldest first.
#[derive(Debug, Clone)]
pub struct WarningHistory {
    pub user_id: u64,
    pub warnings: Vec<Warning>,
}

impl WarningHistory {
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}

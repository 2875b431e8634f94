use super::starboard_models::{PostedMessage, StarboardConfig};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence port for starboard settings and the Hall of Fame posted-set.
///
/// Implementations read their backing storage on every load so edits made by
/// another process (or by hand) are picked up on the next event.
#[async_trait]
pub trait StarboardStore: Send + Sync {
    async fn load_configs(&self) -> Result<Vec<StarboardConfig>, StoreError>;
    /// Replace the record for `config.guild_id`, or append it if none exists.
    async fn save_config(&self, config: StarboardConfig) -> Result<(), StoreError>;
    async fn load_posted(&self) -> Result<Vec<PostedMessage>, StoreError>;
    /// Record a promotion, replacing any entry for the same message.
    async fn save_posted(&self, posted: PostedMessage) -> Result<(), StoreError>;
    /// Drop entries for `message_ids` and hand back the ones that existed.
    async fn remove_posted(&self, message_ids: &[u64]) -> Result<Vec<PostedMessage>, StoreError>;
}

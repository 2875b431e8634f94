use crate::core::starboard::{PostedMessage, StarboardConfig, StarboardStore, StoreError};
use crate::infra::json_file::{read_array, write_array};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// `starboard_posts.json` entry as found on disk. Older files hold bare ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPost {
    Tracked(PostedMessage),
    BareId(#[serde(with = "crate::core::snowflake")] u64),
}

impl From<StoredPost> for PostedMessage {
    fn from(stored: StoredPost) -> Self {
        match stored {
            StoredPost::Tracked(posted) => posted,
            StoredPost::BareId(message_id) => PostedMessage::untracked(message_id),
        }
    }
}

/// Starboard settings in `starboard.json` and promoted message ids in
/// `starboard_posts.json`.
///
/// Nothing is cached: each load re-reads the file, each save rewrites it.
pub struct JsonStarboardStore {
    configs_path: PathBuf,
    posted_path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonStarboardStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            configs_path: data_dir.join("starboard.json"),
            posted_path: data_dir.join("starboard_posts.json"),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl StarboardStore for JsonStarboardStore {
    async fn load_configs(&self) -> Result<Vec<StarboardConfig>, StoreError> {
        Ok(read_array(&self.configs_path).await?)
    }

    async fn save_config(&self, config: StarboardConfig) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut configs: Vec<StarboardConfig> = read_array(&self.configs_path).await?;
        configs.retain(|c| c.guild_id != config.guild_id);
        configs.push(config);

        write_array(&self.configs_path, &configs).await?;
        Ok(())
    }

    async fn load_posted(&self) -> Result<Vec<PostedMessage>, StoreError> {
        let stored: Vec<StoredPost> = read_array(&self.posted_path).await?;
        Ok(stored.into_iter().map(PostedMessage::from).collect())
    }

    async fn save_posted(&self, posted: PostedMessage) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load_posted().await?;
        entries.retain(|p| p.message_id != posted.message_id);
        entries.push(posted);

        write_array(&self.posted_path, &entries).await?;
        Ok(())
    }

    async fn remove_posted(&self, message_ids: &[u64]) -> Result<Vec<PostedMessage>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let (removed, kept): (Vec<_>, Vec<_>) = self
            .load_posted()
            .await?
            .into_iter()
            .partition(|p| message_ids.contains(&p.message_id));

        if !removed.is_empty() {
            write_array(&self.posted_path, &kept).await?;
        }
        Ok(removed)
    }
}

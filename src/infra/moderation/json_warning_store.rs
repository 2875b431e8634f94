use crate::core::moderation::{WarnError, Warning, WarningStore};
use crate::infra::json_file::{read_array, write_array};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Append-only warning log kept in `warnings.json`.
pub struct JsonWarningStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonWarningStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("warnings.json"),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl WarningStore for JsonWarningStore {
    async fn append(&self, warning: Warning) -> Result<(), WarnError> {
        let _guard = self.write_lock.lock().await;

        let mut warnings: Vec<Warning> = read_array(&self.path)
            .await
            .map_err(|e| WarnError::StorageError(e.to_string()))?;
        warnings.push(warning);

        write_array(&self.path, &warnings)
            .await
            .map_err(|e| WarnError::StorageError(e.to_string()))
    }

    async fn load_all(&self) -> Result<Vec<Warning>, WarnError> {
        read_array(&self.path)
            .await
            .map_err(|e| WarnError::StorageError(e.to_string()))
    }
}

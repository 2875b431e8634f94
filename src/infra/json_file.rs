// Shared helpers for the flat JSON "database" files under `data/`.
//
// Every file holds a single pretty-printed array. Reads never fail on a bad
// file: a missing file is an empty collection and a malformed one is logged
// and treated as empty, so one corrupt file can't take a handler down.

use crate::core::starboard::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::Path;
use tokio::fs;

pub async fn read_array<T: DeserializeOwned>(path: &Path) -> io::Result<Vec<T>> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&text) {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "Malformed JSON file, starting from an empty collection: {}",
                e
            );
            Ok(Vec::new())
        }
    }
}

pub async fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let text = serde_json::to_string_pretty(items)?;
    fs::write(path, text).await?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<WriteError> for StoreError {
    fn from(e: WriteError) -> Self {
        match e {
            WriteError::Io(e) => StoreError::Io(e),
            WriteError::Serialization(e) => StoreError::Serialization(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let items: Vec<u32> = read_array(&dir.path().join("nope.json")).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let items: Vec<u32> = read_array(&path).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("items.json");

        write_array(&path, &[1u32, 2, 3]).await.unwrap();

        let items: Vec<u32> = read_array(&path).await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        // Pretty-printed, one element per line
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  1,"));
    }
}

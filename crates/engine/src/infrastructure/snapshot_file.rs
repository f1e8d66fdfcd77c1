//! JSON file snapshot storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::infrastructure::ports::{SnapshotError, SnapshotRepo};
use crate::stores::LearningSnapshot;

/// Stores the learning snapshot as pretty-printed JSON on disk.
///
/// Writes go to a sibling temp file that is renamed over the target so a
/// crash mid-write never leaves a truncated snapshot behind.
pub struct JsonFileSnapshotRepo {
    path: PathBuf,
}

impl JsonFileSnapshotRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotRepo for JsonFileSnapshotRepo {
    async fn load(&self) -> Result<Option<LearningSnapshot>, SnapshotError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::io("read", e)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(SnapshotError::serialization)
    }

    async fn save(&self, snapshot: &LearningSnapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec_pretty(snapshot).map_err(SnapshotError::serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SnapshotError::io("create_dir", e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| SnapshotError::io("write", e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| SnapshotError::io("rename", e))?;

        tracing::debug!(path = %self.path.display(), "Saved learning snapshot");
        Ok(())
    }
}

//! Local storage port traits.

use async_trait::async_trait;

use super::error::SnapshotError;
use crate::stores::LearningSnapshot;

/// Device-local persistence of the learning state between runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepo: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<LearningSnapshot>, SnapshotError>;
    async fn save(&self, snapshot: &LearningSnapshot) -> Result<(), SnapshotError>;
}

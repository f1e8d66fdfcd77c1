//! External service port traits (progress service).

use async_trait::async_trait;
use skillquest_domain::{Badge, UserId};

use super::error::ProgressServiceError;
use super::types::{LevelCompletionRecord, ProgressUpdate, RemoteProgress};

/// Remote owner of durable per-user progress.
///
/// Writes are fire-and-forget from the engine's point of view: they are
/// issued by the sync worker after the local commit and their outcome is
/// only logged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressServicePort: Send + Sync {
    async fn fetch_progress(&self, user_id: &UserId) -> Result<RemoteProgress, ProgressServiceError>;

    async fn update_progress(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), ProgressServiceError>;

    async fn complete_level(
        &self,
        user_id: &UserId,
        record: &LevelCompletionRecord,
    ) -> Result<(), ProgressServiceError>;

    async fn earn_badge(&self, user_id: &UserId, badge: &Badge) -> Result<(), ProgressServiceError>;
}

//! Reconciliation with the progress service.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use skillquest_domain::LevelId;

use super::{ProgressionEngine, ProgressionError};

/// What a successful sync changed locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub total_xp: u32,
    pub level: u32,
    /// Levels the server reports completed that were not completed locally
    pub newly_completed: usize,
    /// Locally completed levels the server does not know about
    pub reverted: usize,
    /// Completed ids the catalog does not contain
    pub unknown_levels: usize,
}

impl ProgressionEngine {
    /// Replace local progress with the progress service's view.
    ///
    /// Every level's `completed` and `unlocked` flags are recomputed from the
    /// remote completed set (a full recomputation, not a merge). XP, badges
    /// and the current course/level are adopted too. Stages and the active
    /// game session are local and stay as they are. If the fetch fails,
    /// nothing changes.
    pub async fn sync_progress(&mut self) -> Result<SyncSummary, ProgressionError> {
        let Some(remote) = self.remote.as_ref() else {
            tracing::debug!("Sync skipped, no progress service configured");
            return Err(ProgressionError::Offline);
        };
        let user_id = remote.user_id.clone();
        let service = Arc::clone(&remote.service);

        let fetched = service.fetch_progress(&user_id).await.map_err(|e| {
            tracing::error!(%user_id, error = %e, "Failed to fetch remote progress, keeping local state");
            ProgressionError::SyncFailed(e.to_string())
        })?;

        let catalog = self.store.catalog();
        let (known, unknown): (BTreeSet<LevelId>, BTreeSet<LevelId>) = fetched
            .completed_levels
            .into_iter()
            .partition(|level_id| catalog.contains(level_id));
        if !unknown.is_empty() {
            tracing::warn!(
                count = unknown.len(),
                ids = ?unknown,
                "Remote progress lists levels missing from the catalog"
            );
        }

        let local = self.store.progress().completed_levels();
        let newly_completed = known.difference(local).count();
        let reverted = local.difference(&known).count();

        let overlay: HashSet<LevelId> = known.iter().cloned().collect();
        self.store.catalog_mut().overlay_completed(&overlay);

        let progress = self.store.progress_mut();
        progress.adopt_remote(
            fetched.total_xp,
            known,
            fetched.badges,
            fetched.current_course,
            fetched.current_level,
        );

        let summary = SyncSummary {
            total_xp: progress.total_xp(),
            level: progress.level(),
            newly_completed,
            reverted,
            unknown_levels: unknown.len(),
        };
        tracing::info!(
            %user_id,
            total_xp = summary.total_xp,
            level = summary.level,
            newly_completed,
            reverted,
            "Progress synced"
        );
        Ok(summary)
    }
}

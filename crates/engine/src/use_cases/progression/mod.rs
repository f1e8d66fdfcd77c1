//! Level progression use cases.
//!
//! [`ProgressionEngine`] owns the learning state and is the only writer.
//! Operations run to completion synchronously against local state; durable
//! events are then handed to the [`SyncOutbox`] without waiting on the
//! network. The flow of a level:
//!
//! 1. `advance_stage` / `advance_to_next_stage` walk the stage pipeline
//! 2. `start_game` opens (or resumes) the level's game session
//! 3. `complete_game` folds each result into the session; on success it
//!    runs `complete_level`, moves the level to `complete` and clears the session
//! 4. `complete_level` awards XP, unlocks the next level, and replicates
//! 5. `sync_progress` replaces local completion flags with the server's view
//!
//! Every operation returns a `Result`; an `Err` means nothing changed.

mod badges;
mod completion;
mod error;
mod game_session;
mod stage;
mod sync;

use std::sync::Arc;

use skillquest_domain::{Catalog, GameSession, Level, LevelId, UserId, UserProgress};

use crate::infrastructure::ports::{ClockPort, ProgressServicePort, SnapshotError};
use crate::infrastructure::sync_worker::SyncOutbox;
use crate::stores::{LearningSnapshot, LearningStore, RestoreReport};

pub use completion::LevelOutcome;
pub use error::ProgressionError;
pub use game_session::GameOutcome;
pub use sync::SyncSummary;

/// Remote side of an authenticated learner.
struct RemoteLink {
    user_id: UserId,
    service: Arc<dyn ProgressServicePort>,
}

/// The level-progression state machine.
pub struct ProgressionEngine {
    store: LearningStore,
    outbox: SyncOutbox,
    clock: Arc<dyn ClockPort>,
    remote: Option<RemoteLink>,
}

impl ProgressionEngine {
    pub fn new(catalog: Catalog, outbox: SyncOutbox, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            store: LearningStore::new(catalog),
            outbox,
            clock,
            remote: None,
        }
    }

    /// Enable `sync_progress` for an authenticated learner.
    pub fn with_remote(mut self, user_id: UserId, service: Arc<dyn ProgressServicePort>) -> Self {
        self.remote = Some(RemoteLink { user_id, service });
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    /// Shared snapshot of the catalog that later mutations will not alter.
    pub fn catalog_snapshot(&self) -> Arc<Catalog> {
        self.store.catalog_snapshot()
    }

    pub fn level(&self, level_id: &LevelId) -> Option<&Level> {
        self.store.level(level_id)
    }

    pub fn progress(&self) -> &UserProgress {
        self.store.progress()
    }

    pub fn current_game(&self) -> Option<&GameSession> {
        self.store.progress().current_game()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.remote.as_ref().map(|remote| &remote.user_id)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn snapshot(&self) -> LearningSnapshot {
        self.store.snapshot(self.clock.now())
    }

    pub fn restore_snapshot(
        &mut self,
        snapshot: LearningSnapshot,
    ) -> Result<RestoreReport, SnapshotError> {
        let report = self.store.restore(snapshot)?;
        if report.levels_skipped > 0 || report.session_dropped {
            tracing::warn!(
                skipped = report.levels_skipped,
                session_dropped = report.session_dropped,
                "Snapshot referenced levels missing from the catalog"
            );
        }
        tracing::info!(
            applied = report.levels_applied,
            total_xp = self.progress().total_xp(),
            "Restored learning snapshot"
        );
        Ok(report)
    }

    // =========================================================================
    // Helpers shared by the operation modules
    // =========================================================================

    /// Look up a level, logging the miss as a programming error.
    fn require_level(&self, level_id: &LevelId, operation: &'static str) -> Result<&Level, ProgressionError> {
        self.store.level(level_id).ok_or_else(|| {
            tracing::error!(%level_id, operation, "Level not found in catalog");
            ProgressionError::LevelNotFound(level_id.clone())
        })
    }
}

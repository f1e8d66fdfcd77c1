//! In-memory learning state: the catalog snapshot plus cached user progress.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillquest_domain::{Catalog, Level, LevelId, LevelState, UserProgress};

use crate::infrastructure::ports::SnapshotError;

/// Current on-disk snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted learning state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub progress: UserProgress,
    pub levels: BTreeMap<LevelId, LevelState>,
}

/// What a restore applied and what it had to drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub levels_applied: usize,
    pub levels_skipped: usize,
    pub session_dropped: bool,
}

/// Single-writer learning state.
///
/// The catalog lives behind an `Arc`: [`LearningStore::catalog_snapshot`]
/// hands out a shared copy, and [`LearningStore::catalog_mut`] clones on
/// write when such a copy is still alive, so readers always see either the
/// old or the new catalog in full.
#[derive(Debug, Clone)]
pub struct LearningStore {
    catalog: Arc<Catalog>,
    progress: UserProgress,
}

impl LearningStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            progress: UserProgress::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        Arc::make_mut(&mut self.catalog)
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut UserProgress {
        &mut self.progress
    }

    pub fn level(&self, level_id: &LevelId) -> Option<&Level> {
        self.catalog.level(level_id)
    }

    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> LearningSnapshot {
        LearningSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at,
            progress: self.progress.clone(),
            levels: self.catalog.level_states().into_iter().collect(),
        }
    }

    /// Overlay a persisted snapshot onto the current catalog.
    ///
    /// Level ids the catalog no longer knows are skipped, and a saved game
    /// session for such a level is dropped. Stored `unlocked` flags and the
    /// stored user level are not trusted. A level counts as completed when
    /// either its flag or the progress record says so; unlocks and the level
    /// are derived again from that.
    pub fn restore(&mut self, snapshot: LearningSnapshot) -> Result<RestoreReport, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut report = RestoreReport::default();

        let catalog = Arc::make_mut(&mut self.catalog);
        for (level_id, state) in snapshot.levels {
            if catalog.apply_level_state(&level_id, state) {
                report.levels_applied += 1;
            } else {
                report.levels_skipped += 1;
            }
        }

        let had_session = snapshot.progress.current_game().is_some();
        self.progress = snapshot.progress;
        self.progress.normalize();
        self.progress
            .retain_known_levels(|level_id| catalog.contains(level_id));
        report.session_dropped = had_session && self.progress.current_game().is_none();

        let flagged: Vec<LevelId> = catalog
            .levels()
            .filter(|level| level.completed())
            .map(|level| level.id.clone())
            .collect();
        for level_id in flagged {
            self.progress.record_completed(level_id);
        }
        let completed: HashSet<LevelId> =
            self.progress.completed_levels().iter().cloned().collect();
        catalog.overlay_completed(&completed);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{fixed_now, sample_catalog};
    use skillquest_domain::{GameSession, Stage};

    #[test]
    fn readers_keep_their_snapshot_across_writes() {
        let mut store = LearningStore::new(sample_catalog());
        let before = store.catalog_snapshot();

        store
            .catalog_mut()
            .set_stage(&"dsa-1".into(), Stage::AiVideos);

        let level_id = LevelId::from("dsa-1");
        assert_eq!(
            before.level(&level_id).map(Level::current_stage),
            Some(Stage::Narrative)
        );
        assert_eq!(
            store.level(&level_id).map(Level::current_stage),
            Some(Stage::AiVideos)
        );
    }

    #[test]
    fn restore_skips_unknown_levels_and_orphaned_sessions() {
        let mut source = LearningStore::new(sample_catalog());
        source.catalog_mut().mark_completed(&"dsa-1".into());
        source
            .progress_mut()
            .set_current_game(Some(GameSession::new("retired-7".into(), "maze".into())));
        let mut snapshot = source.snapshot(fixed_now());
        snapshot.levels.insert(
            "retired-7".into(),
            LevelState {
                unlocked: true,
                completed: true,
                current_stage: Stage::Complete,
            },
        );

        let mut target = LearningStore::new(sample_catalog());
        let report = target.restore(snapshot).expect("supported version");

        assert_eq!(report.levels_skipped, 1);
        assert_eq!(report.levels_applied, 5);
        assert!(report.session_dropped);
        assert!(target
            .level(&"dsa-2".into())
            .is_some_and(Level::unlocked));
    }

    #[test]
    fn restore_rederives_level_and_unlocks() {
        let source = LearningStore::new(sample_catalog());
        let mut json = serde_json::to_value(source.snapshot(fixed_now())).expect("serialize");
        json["progress"]["totalXp"] = 1000.into();
        json["progress"]["level"] = 1.into();
        json["progress"]["completedLevels"] = serde_json::json!(["web-1"]);
        json["levels"]["dsa-3"]["unlocked"] = true.into();
        json["levels"]["dsa-1"]["completed"] = true.into();
        let snapshot: LearningSnapshot = serde_json::from_value(json).expect("deserialize");

        let mut target = LearningStore::new(sample_catalog());
        target.restore(snapshot).expect("supported version");

        assert_eq!(target.progress().level(), 3);
        assert!(!target.level(&"dsa-3".into()).is_some_and(Level::unlocked));
        assert!(target.level(&"dsa-2".into()).is_some_and(Level::unlocked));
        assert!(target.level(&"web-1".into()).is_some_and(Level::completed));
        assert!(target.level(&"web-2".into()).is_some_and(Level::unlocked));
        assert!(target.progress().has_completed(&"dsa-1".into()));
    }

    #[test]
    fn restore_rejects_other_snapshot_versions() {
        let mut source = LearningStore::new(sample_catalog());
        source.progress_mut().award_xp(300);
        let mut snapshot = source.snapshot(fixed_now());
        snapshot.version = SNAPSHOT_VERSION + 1;

        let mut target = LearningStore::new(sample_catalog());
        let err = target.restore(snapshot).expect_err("unsupported");

        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found, expected }
                if found == SNAPSHOT_VERSION + 1 && expected == SNAPSHOT_VERSION
        ));
        assert_eq!(target.progress().total_xp(), 0);
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let store = LearningStore::new(sample_catalog());
        let json = serde_json::to_value(store.snapshot(fixed_now())).expect("serialize");
        assert_eq!(json["version"], SNAPSHOT_VERSION);
        assert_eq!(json["levels"]["dsa-1"]["currentStage"], "narrative");
        assert_eq!(json["progress"]["totalXp"], 0);
    }
}

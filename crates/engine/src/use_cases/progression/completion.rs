//! Level completion, unlock propagation and level selection.

use skillquest_domain::{BadgeId, LevelCompletion, LevelId, ProgressEvent, XpAward};

use super::{ProgressionEngine, ProgressionError};

/// Result of completing a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOutcome {
    pub completion: LevelCompletion,
    pub xp: XpAward,
    /// Course completion badge earned by this completion
    pub badge_earned: Option<BadgeId>,
}

impl ProgressionEngine {
    /// Award XP, mark the level completed and unlock the next level of its
    /// course, then queue replication.
    ///
    /// The local commit happens first and is never rolled back by a failed
    /// replication.
    pub fn complete_level(
        &mut self,
        level_id: &LevelId,
        xp_earned: u32,
    ) -> Result<LevelOutcome, ProgressionError> {
        self.require_level(level_id, "complete_level")?;

        let Some(completion) = self.store.catalog_mut().mark_completed(level_id) else {
            return Err(ProgressionError::LevelNotFound(level_id.clone()));
        };

        let progress = self.store.progress_mut();
        let xp = progress.award_xp(xp_earned);
        if !progress.record_completed(level_id.clone()) {
            tracing::debug!(%level_id, "Level was already completed, XP awarded again");
        }
        progress.set_current(completion.course_id.clone(), level_id.clone());

        tracing::info!(
            %level_id,
            course_id = %completion.course_id,
            xp_earned,
            total_xp = xp.total_xp,
            level = xp.level,
            unlocked_next = ?completion.unlocked_next,
            "Level completed"
        );
        if xp.leveled_up() {
            tracing::info!(from = xp.previous_level, to = xp.level, "Player leveled up");
        }

        self.outbox.enqueue(ProgressEvent::LevelCompleted {
            level_id: level_id.clone(),
            course_id: completion.course_id.clone(),
            xp_earned,
        });
        self.enqueue_progress_snapshot();

        let badge_earned = if completion.course_completed {
            self.award_course_badge(&completion)
        } else {
            None
        };

        Ok(LevelOutcome {
            completion,
            xp,
            badge_earned,
        })
    }

    /// Make `level_id` the learner's current level.
    pub fn select_level(&mut self, level_id: &LevelId) -> Result<(), ProgressionError> {
        let level = self.require_level(level_id, "select_level")?;
        if !level.unlocked() {
            tracing::warn!(%level_id, "Cannot select a locked level");
            return Err(ProgressionError::LevelLocked(level_id.clone()));
        }
        let course_id = level.course_id.clone();

        self.store
            .progress_mut()
            .set_current(course_id, level_id.clone());
        tracing::debug!(%level_id, "Level selected");
        Ok(())
    }

    fn enqueue_progress_snapshot(&self) {
        let progress = self.store.progress();
        self.outbox.enqueue(ProgressEvent::ProgressUpdated {
            total_xp: progress.total_xp(),
            level: progress.level(),
            current_course: progress.current_course().cloned(),
            current_level: progress.current_level().cloned(),
        });
    }

    fn award_course_badge(&mut self, completion: &LevelCompletion) -> Option<BadgeId> {
        let badge = self
            .catalog()
            .course(&completion.course_id)?
            .completion_badge
            .clone()?;

        match self.earn_badge(badge) {
            Ok(earned) => Some(earned.badge.id),
            Err(e) => {
                tracing::debug!(course_id = %completion.course_id, error = %e, "Course badge not awarded");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use skillquest_domain::{LevelId, ProgressEvent};

    use crate::test_fixtures::{drain, engine_with_outbox};
    use crate::use_cases::{ProgressionEngine, ProgressionError};

    fn unlocked(engine: &ProgressionEngine, id: &str) -> bool {
        engine
            .level(&LevelId::from(id))
            .is_some_and(|level| level.unlocked())
    }

    #[test]
    fn completion_unlocks_only_the_next_level_in_the_course() {
        let (mut engine, _rx) = engine_with_outbox();

        let outcome = engine
            .complete_level(&"dsa-1".into(), 100)
            .expect("complete");

        assert_eq!(outcome.completion.unlocked_next, Some("dsa-2".into()));
        assert!(unlocked(&engine, "dsa-2"));
        assert!(!unlocked(&engine, "dsa-3"));
        assert!(!unlocked(&engine, "web-2"));
        assert!(engine.progress().has_completed(&"dsa-1".into()));
        assert_eq!(engine.progress().current_level(), Some(&"dsa-1".into()));
        assert_eq!(engine.progress().current_course(), Some(&"dsa".into()));
    }

    #[test]
    fn level_is_recomputed_from_total_xp() {
        let (mut engine, _rx) = engine_with_outbox();

        let first = engine.complete_level(&"dsa-1".into(), 450).expect("complete");
        assert_eq!(first.xp.level, 1);
        assert!(!first.xp.leveled_up());

        let second = engine.complete_level(&"dsa-2".into(), 100).expect("complete");
        assert_eq!(second.xp.total_xp, 550);
        assert_eq!(second.xp.level, 2);
        assert!(second.xp.leveled_up());
        assert_eq!(engine.progress().level(), 2);
    }

    #[test]
    fn replicates_completion_then_progress_snapshot() {
        let (mut engine, mut rx) = engine_with_outbox();
        engine.complete_level(&"web-1".into(), 80).expect("complete");

        let events: Vec<ProgressEvent> = drain(&mut rx).into_iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![
                ProgressEvent::LevelCompleted {
                    level_id: "web-1".into(),
                    course_id: "web".into(),
                    xp_earned: 80,
                },
                ProgressEvent::ProgressUpdated {
                    total_xp: 80,
                    level: 1,
                    current_course: Some("web".into()),
                    current_level: Some("web-1".into()),
                },
            ]
        );
    }

    #[test]
    fn repeated_completion_awards_xp_but_records_level_once() {
        let (mut engine, _rx) = engine_with_outbox();
        engine.complete_level(&"dsa-1".into(), 100).expect("first");
        engine.complete_level(&"dsa-1".into(), 100).expect("second");

        assert_eq!(engine.progress().total_xp(), 200);
        assert_eq!(engine.progress().completed_levels().len(), 1);
    }

    #[test]
    fn finishing_a_course_earns_its_badge_once() {
        let (mut engine, mut rx) = engine_with_outbox();
        engine.complete_level(&"dsa-1".into(), 100).expect("dsa-1");
        engine.complete_level(&"dsa-2".into(), 150).expect("dsa-2");
        let last = engine.complete_level(&"dsa-3".into(), 200).expect("dsa-3");

        assert!(last.completion.course_completed);
        assert_eq!(last.badge_earned, Some("dsa-master".into()));
        assert!(engine.progress().has_badge(&"dsa-master".into()));

        let again = engine.complete_level(&"dsa-3".into(), 200).expect("again");
        assert_eq!(again.badge_earned, None);

        let badges = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e.event, ProgressEvent::BadgeEarned { .. }))
            .count();
        assert_eq!(badges, 1);
    }

    #[test]
    fn unknown_level_changes_nothing() {
        let (mut engine, mut rx) = engine_with_outbox();
        let before = engine.catalog_snapshot();

        let result = engine.complete_level(&"ghost".into(), 500);

        assert_eq!(result, Err(ProgressionError::LevelNotFound("ghost".into())));
        assert_eq!(engine.progress().total_xp(), 0);
        assert_eq!(engine.catalog(), before.as_ref());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn readers_keep_the_catalog_they_took() {
        let (mut engine, _rx) = engine_with_outbox();
        let before = engine.catalog_snapshot();

        engine.complete_level(&"dsa-1".into(), 100).expect("complete");

        assert!(before.level(&"dsa-2".into()).is_some_and(|l| !l.unlocked()));
        assert!(unlocked(&engine, "dsa-2"));
    }

    #[test]
    fn select_level_rejects_locked_levels() {
        let (mut engine, _rx) = engine_with_outbox();

        assert_eq!(
            engine.select_level(&"dsa-2".into()),
            Err(ProgressionError::LevelLocked("dsa-2".into()))
        );
        engine.select_level(&"web-1".into()).expect("unlocked");
        assert_eq!(engine.progress().current_course(), Some(&"web".into()));
        assert_eq!(engine.progress().current_level(), Some(&"web-1".into()));
    }
}

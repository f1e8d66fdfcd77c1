//! Badge awards.

use skillquest_domain::{Badge, EarnedBadge, ProgressEvent};

use super::{ProgressionEngine, ProgressionError};

impl ProgressionEngine {
    /// Add a badge to the learner's collection and queue replication.
    ///
    /// Badges are keyed by id; a badge already held is rejected and not
    /// replicated again.
    pub fn earn_badge(&mut self, badge: Badge) -> Result<EarnedBadge, ProgressionError> {
        if self.store.progress().has_badge(&badge.id) {
            tracing::debug!(badge_id = %badge.id, "Badge already earned");
            return Err(ProgressionError::BadgeAlreadyEarned(badge.id));
        }

        let earned = EarnedBadge {
            badge: badge.clone(),
            earned_at: Some(self.clock.now()),
        };
        self.store.progress_mut().add_badge(earned.clone());

        tracing::info!(badge_id = %badge.id, rarity = %badge.rarity, "Badge earned");
        self.outbox.enqueue(ProgressEvent::BadgeEarned { badge });
        Ok(earned)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use skillquest_domain::{Badge, BadgeRarity, ProgressEvent};

    use crate::infrastructure::ports::MockClockPort;
    use crate::infrastructure::sync_worker::SyncOutbox;
    use crate::test_fixtures::{drain, engine_with_outbox, fixed_now, sample_catalog};
    use crate::use_cases::{ProgressionEngine, ProgressionError};

    #[test]
    fn earned_badge_is_stamped_and_replicated() {
        let (mut engine, mut rx) = engine_with_outbox();
        let badge = Badge::new("first-steps", "First Steps").with_rarity(BadgeRarity::Rare);

        let earned = engine.earn_badge(badge.clone()).expect("earn");

        assert_eq!(earned.earned_at, Some(fixed_now()));
        assert!(engine.progress().has_badge(&badge.id));
        let events: Vec<ProgressEvent> = drain(&mut rx).into_iter().map(|e| e.event).collect();
        assert_eq!(events, vec![ProgressEvent::BadgeEarned { badge }]);
    }

    #[test]
    fn duplicate_badge_is_rejected_without_replication() {
        let (mut engine, mut rx) = engine_with_outbox();
        let badge = Badge::new("first-steps", "First Steps");
        engine.earn_badge(badge.clone()).expect("earn");
        drain(&mut rx);

        assert_eq!(
            engine.earn_badge(badge),
            Err(ProgressionError::BadgeAlreadyEarned("first-steps".into()))
        );
        assert_eq!(engine.progress().badges().len(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn uses_the_injected_clock() {
        let at = Utc
            .with_ymd_and_hms(2026, 5, 4, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).return_const(at);

        let mut engine =
            ProgressionEngine::new(sample_catalog(), SyncOutbox::disconnected(), Arc::new(clock));
        let earned = engine
            .earn_badge(Badge::new("night-owl", "Night Owl"))
            .expect("earn");

        assert_eq!(earned.earned_at, Some(at));
    }
}

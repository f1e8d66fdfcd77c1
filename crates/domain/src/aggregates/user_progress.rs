//! UserProgress aggregate - A learner's XP, level, completions, badges and active game
//!
//! The player level is never stored independently: it is recomputed from
//! `total_xp` on every change via [`level_for_xp`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::{EarnedBadge, GameSession};
use crate::events::XpAward;
use crate::{BadgeId, CourseId, LevelId};

/// XP needed per player level.
pub const XP_PER_LEVEL: u32 = 500;

/// Player level for a cumulative XP total: `floor(total_xp / 500) + 1`.
pub fn level_for_xp(total_xp: u32) -> u32 {
    total_xp / XP_PER_LEVEL + 1
}

/// Cached copy of a learner's durable progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    total_xp: u32,
    level: u32,
    badges: Vec<EarnedBadge>,
    completed_levels: BTreeSet<LevelId>,
    current_course: Option<CourseId>,
    current_level: Option<LevelId>,
    current_game: Option<GameSession>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl UserProgress {
    /// Fresh progress for a new learner (all zero, level 1).
    pub fn new() -> Self {
        Self {
            total_xp: 0,
            level: level_for_xp(0),
            badges: Vec::new(),
            completed_levels: BTreeSet::new(),
            current_course: None,
            current_level: None,
            current_game: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn badges(&self) -> &[EarnedBadge] {
        &self.badges
    }

    pub fn has_badge(&self, badge_id: &BadgeId) -> bool {
        self.badges.iter().any(|earned| &earned.badge.id == badge_id)
    }

    pub fn completed_levels(&self) -> &BTreeSet<LevelId> {
        &self.completed_levels
    }

    pub fn has_completed(&self, level_id: &LevelId) -> bool {
        self.completed_levels.contains(level_id)
    }

    pub fn current_course(&self) -> Option<&CourseId> {
        self.current_course.as_ref()
    }

    pub fn current_level(&self) -> Option<&LevelId> {
        self.current_level.as_ref()
    }

    pub fn current_game(&self) -> Option<&GameSession> {
        self.current_game.as_ref()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add XP and recompute the player level.
    pub fn award_xp(&mut self, xp_earned: u32) -> XpAward {
        let previous_level = self.level;
        self.total_xp = self.total_xp.saturating_add(xp_earned);
        self.level = level_for_xp(self.total_xp);
        XpAward {
            xp_earned,
            total_xp: self.total_xp,
            previous_level,
            level: self.level,
        }
    }

    /// Record a completed level. Returns `false` if it was already recorded.
    pub fn record_completed(&mut self, level_id: LevelId) -> bool {
        self.completed_levels.insert(level_id)
    }

    pub fn set_current(&mut self, course_id: CourseId, level_id: LevelId) {
        self.current_course = Some(course_id);
        self.current_level = Some(level_id);
    }

    /// Add a badge unless one with the same id is already held.
    pub fn add_badge(&mut self, earned: EarnedBadge) -> bool {
        if self.has_badge(&earned.badge.id) {
            return false;
        }
        self.badges.push(earned);
        true
    }

    pub fn set_current_game(&mut self, session: Option<GameSession>) {
        self.current_game = session;
    }

    pub fn current_game_mut(&mut self) -> Option<&mut GameSession> {
        self.current_game.as_mut()
    }

    pub fn take_current_game(&mut self) -> Option<GameSession> {
        self.current_game.take()
    }

    /// Adopt the authoritative remote view. The active game session is local
    /// only and is kept.
    pub fn adopt_remote(
        &mut self,
        total_xp: u32,
        completed_levels: BTreeSet<LevelId>,
        badges: Vec<EarnedBadge>,
        current_course: Option<CourseId>,
        current_level: Option<LevelId>,
    ) {
        self.total_xp = total_xp;
        self.level = level_for_xp(total_xp);
        self.completed_levels = completed_levels;
        self.badges = Vec::with_capacity(badges.len());
        for earned in badges {
            self.add_badge(earned);
        }
        self.current_course = current_course;
        self.current_level = current_level;
    }

    /// Rederive the player level from total XP, discarding whatever level
    /// was loaded alongside it.
    pub fn normalize(&mut self) {
        self.level = level_for_xp(self.total_xp);
    }

    /// Drop any reference to levels the catalog no longer contains.
    pub fn retain_known_levels(&mut self, is_known: impl Fn(&LevelId) -> bool) {
        self.completed_levels.retain(|id| is_known(id));
        if self
            .current_game
            .as_ref()
            .is_some_and(|session| !is_known(&session.level_id))
        {
            self.current_game = None;
        }
    }
}

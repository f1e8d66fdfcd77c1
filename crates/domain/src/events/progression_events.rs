//! Catalog and progress mutation outcomes.

use crate::value_objects::Stage;
use crate::{CourseId, LevelId};

/// Outcome of moving a level to a new stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChanged {
    pub level_id: LevelId,
    pub from: Stage,
    pub to: Stage,
}

/// Outcome of marking a level completed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCompletion {
    pub level_id: LevelId,
    pub course_id: CourseId,
    /// The immediately following level, if one exists and was newly unlocked
    pub unlocked_next: Option<LevelId>,
    /// Every level of the owning course is now completed
    pub course_completed: bool,
}

/// Outcome of adding XP to a learner's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub xp_earned: u32,
    pub total_xp: u32,
    pub previous_level: u32,
    pub level: u32,
}

impl XpAward {
    pub fn leveled_up(&self) -> bool {
        self.level > self.previous_level
    }
}

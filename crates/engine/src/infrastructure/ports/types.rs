//! Helper types for port operations.

use std::collections::BTreeSet;

use skillquest_domain::{CourseId, EarnedBadge, LevelId};

/// The progress service's authoritative view of a learner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteProgress {
    pub total_xp: u32,
    pub current_course: Option<CourseId>,
    pub current_level: Option<LevelId>,
    pub completed_levels: BTreeSet<LevelId>,
    pub badges: Vec<EarnedBadge>,
}

/// Progress snapshot pushed after local changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub total_xp: u32,
    pub level: u32,
    pub current_course: Option<CourseId>,
    pub current_level: Option<LevelId>,
}

/// One completed level pushed to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCompletionRecord {
    pub level_id: LevelId,
    pub course_id: CourseId,
    pub xp_earned: u32,
}

//! Domain Events
//!
//! `progression_events` holds the return types of catalog and progress
//! mutations. [`ProgressEvent`] is the coarse-grained outbound event that the
//! engine replicates to the progress service after a local commit.

pub mod progression_events;

pub use progression_events::*;

use serde::{Deserialize, Serialize};

use crate::entities::Badge;
use crate::{CourseId, LevelId};

/// Durable progress change to replicate to the progress service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressEvent {
    LevelCompleted {
        level_id: LevelId,
        course_id: CourseId,
        xp_earned: u32,
    },
    ProgressUpdated {
        total_xp: u32,
        level: u32,
        current_course: Option<CourseId>,
        current_level: Option<LevelId>,
    },
    BadgeEarned {
        badge: Badge,
    },
}

impl ProgressEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::LevelCompleted { .. } => "level_completed",
            Self::ProgressUpdated { .. } => "progress_updated",
            Self::BadgeEarned { .. } => "badge_earned",
        }
    }
}

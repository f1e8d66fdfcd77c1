//! Course entity - An ordered sequence of levels

use serde::{Deserialize, Serialize};

use super::{Badge, Level};
use crate::{CourseId, LevelId};

/// A course exclusively owns its levels; order in `levels` is the unlock chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub levels: Vec<Level>,
    /// Awarded once every level in the course is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_badge: Option<Badge>,
}

impl Course {
    pub fn new(id: impl Into<CourseId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            icon: None,
            levels: Vec::new(),
            completion_badge: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.levels.push(level);
        self
    }

    pub fn with_completion_badge(mut self, badge: Badge) -> Self {
        self.completion_badge = Some(badge);
        self
    }

    pub fn level_index(&self, level_id: &LevelId) -> Option<usize> {
        self.levels.iter().position(|level| &level.id == level_id)
    }

    pub fn completed_count(&self) -> usize {
        self.levels.iter().filter(|level| level.completed()).count()
    }

    pub fn is_completed(&self) -> bool {
        !self.levels.is_empty() && self.levels.iter().all(Level::completed)
    }
}

//! Level stages and the transition validator.
//!
//! Every level moves through the same fixed pipeline:
//!
//! ```text
//! narrative → teaching-game → ai-videos → assessment → practice-game → resources → complete
//! ```
//!
//! Individual levels skip stages they have no content for (see
//! [`Level::stage_path`](crate::entities::Level::stage_path)), but the order
//! itself never changes. [`validate_transition`] is the single authority on
//! whether a requested stage change is legal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One phase of a level's pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    #[default]
    Narrative,
    TeachingGame,
    AiVideos,
    Assessment,
    PracticeGame,
    Resources,
    Complete,
}

impl Stage {
    /// The fixed total order used for forward-transition validation.
    pub const ORDER: [Stage; 7] = [
        Stage::Narrative,
        Stage::TeachingGame,
        Stage::AiVideos,
        Stage::Assessment,
        Stage::PracticeGame,
        Stage::Resources,
        Stage::Complete,
    ];

    /// Position of this stage within [`Stage::ORDER`].
    pub fn position(self) -> usize {
        match self {
            Stage::Narrative => 0,
            Stage::TeachingGame => 1,
            Stage::AiVideos => 2,
            Stage::Assessment => 3,
            Stage::PracticeGame => 4,
            Stage::Resources => 5,
            Stage::Complete => 6,
        }
    }

    /// Wire/catalog tag for this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Narrative => "narrative",
            Stage::TeachingGame => "teaching-game",
            Stage::AiVideos => "ai-videos",
            Stage::Assessment => "assessment",
            Stage::PracticeGame => "practice-game",
            Stage::Resources => "resources",
            Stage::Complete => "complete",
        }
    }

    /// Stages in which a game session may be started.
    pub fn is_game(self) -> bool {
        matches!(self, Stage::TeachingGame | Stage::PracticeGame)
    }

    pub fn is_complete(self) -> bool {
        self == Stage::Complete
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ORDER
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown stage: {}", s)))
    }
}

/// How an accepted transition was justified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Strictly forward in the fixed order.
    Forward,
    /// `practice-game → complete` on a level with nothing to show in `resources`.
    SkipResources,
    /// Jump back to `narrative` to replay the level.
    Restart,
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionRejection {
    #[error("level is already in stage {0}")]
    SameStage(Stage),

    #[error("cannot move backward from {from} to {to}")]
    Backward { from: Stage, to: Stage },

    #[error("cannot restart a level while its teaching game is in progress")]
    RestartFromTeachingGame,
}

/// Decide whether `current → next` is a legal stage change.
///
/// The two bypass rules are checked as named cases before the general
/// ordering check so they stay visible in the returned [`TransitionKind`].
pub fn validate_transition(
    current: Stage,
    next: Stage,
    has_external_resources: bool,
) -> Result<TransitionKind, TransitionRejection> {
    if current == next {
        return Err(TransitionRejection::SameStage(current));
    }

    if next == Stage::Complete && current == Stage::PracticeGame && !has_external_resources {
        return Ok(TransitionKind::SkipResources);
    }

    if next.position() > current.position() {
        return Ok(TransitionKind::Forward);
    }

    if next.position() == 0 {
        if current == Stage::TeachingGame {
            return Err(TransitionRejection::RestartFromTeachingGame);
        }
        return Ok(TransitionKind::Restart);
    }

    Err(TransitionRejection::Backward {
        from: current,
        to: next,
    })
}

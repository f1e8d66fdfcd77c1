//! SkillQuest domain.
//!
//! Courses are ordered sequences of levels; each level moves through a fixed
//! stage pipeline (narrative → teaching game → videos → assessment → practice
//! game → resources → complete). This crate holds the pure, synchronous part
//! of that model: the catalog, the stage transition rules, game sessions, and
//! the learner's progress. Orchestration, logging and I/O live in the engine.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    level_for_xp, Catalog, LevelPosition, LevelState, UserProgress, XP_PER_LEVEL,
};

pub use entities::{
    Badge, BadgeRarity, CodingProblem, Course, EarnedBadge, ExternalResource, GameSession, Level,
    QuizQuestion, ResourceKind,
};

pub use error::DomainError;
pub use events::{LevelCompletion, ProgressEvent, StageChanged, XpAward};

// Re-export ID types
pub use ids::{BadgeId, CourseId, GameId, LevelId, UserId};

pub use value_objects::{
    validate_transition, GameConfig, GamePlacement, GameResult, Stage, TransitionKind,
    TransitionRejection,
};

//! Domain entities - Core business objects with identity

mod badge;
mod course;
mod game_session;
mod level;

pub use badge::{Badge, BadgeRarity, EarnedBadge};
pub use course::Course;
pub use game_session::GameSession;
pub use level::{CodingProblem, ExternalResource, Level, QuizQuestion, ResourceKind};

//! Value objects - Immutable objects defined by their attributes

mod game;
mod stage;

pub use game::{GameConfig, GamePlacement, GameResult};
pub use stage::{validate_transition, Stage, TransitionKind, TransitionRejection};

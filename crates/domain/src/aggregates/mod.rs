//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns outcome types from mutations
//!
//! | Aggregate | Owns |
//! |-----------|------|
//! | [`Catalog`] | Courses, their ordered levels, and each level's progression flags |
//! | [`UserProgress`] | XP, derived level, completed levels, badges, the active game session |

pub mod catalog;
pub mod user_progress;

pub use catalog::{Catalog, LevelPosition, LevelState};
pub use user_progress::{level_for_xp, UserProgress, XP_PER_LEVEL};

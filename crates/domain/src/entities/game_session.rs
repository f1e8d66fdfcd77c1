//! GameSession entity - The one in-progress game a learner may have

use serde::{Deserialize, Serialize};

use crate::value_objects::GameResult;
use crate::{GameId, LevelId};

/// Accumulated state of a game being played for one level.
///
/// Survives failed attempts and navigation away from the game so that
/// `attempts` and `best_score` carry over when the game is resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub level_id: LevelId,
    pub game_id: GameId,
    pub attempts: u32,
    pub best_score: u32,
    pub time_spent_seconds: u32,
    pub completed: bool,
}

impl GameSession {
    pub fn new(level_id: LevelId, game_id: GameId) -> Self {
        Self {
            level_id,
            game_id,
            attempts: 0,
            best_score: 0,
            time_spent_seconds: 0,
            completed: false,
        }
    }

    /// Reopen a session for another round; counters are kept.
    pub fn resume(mut self) -> Self {
        self.completed = false;
        self
    }

    /// Fold one play-through into the counters.
    pub fn record_attempt(&mut self, result: &GameResult) {
        self.best_score = self.best_score.max(result.score);
        self.attempts = self.attempts.saturating_add(1);
        self.time_spent_seconds = self
            .time_spent_seconds
            .saturating_add(result.time_spent_seconds);
    }
}

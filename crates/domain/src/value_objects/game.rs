//! Game configuration and result value objects.

use serde::{Deserialize, Serialize};

use crate::GameId;

/// Where a level's game sits in the stage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GamePlacement {
    /// Played as `teaching-game`, before the videos and assessment.
    Teaching,
    /// Played as `practice-game`, after the assessment.
    #[default]
    Practice,
}

/// Configuration handed to a game implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Which mini-game variant to launch
    pub game_id: GameId,
    /// Minimum score the game must see to report success
    pub passing_score: u32,
    #[serde(default)]
    pub placement: GamePlacement,
    /// Optional soft time limit shown by the game
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u32>,
}

impl GameConfig {
    pub fn new(game_id: impl Into<GameId>, passing_score: u32) -> Self {
        Self {
            game_id: game_id.into(),
            passing_score,
            placement: GamePlacement::Practice,
            time_limit_seconds: None,
        }
    }

    pub fn with_placement(mut self, placement: GamePlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    /// Build the normalized result a game reports through `onComplete`.
    ///
    /// Games own the pass/fail decision; this helper applies the usual
    /// `score >= passing_score` rule for implementations that want it.
    pub fn result_for(&self, score: u32, time_spent_seconds: u32, xp_reward: u32) -> GameResult {
        let success = score >= self.passing_score;
        GameResult {
            score,
            time_spent_seconds,
            success,
            xp_earned: if success { xp_reward } else { 0 },
        }
    }
}

/// Normalized outcome of one play-through, consumed once by the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub score: u32,
    pub time_spent_seconds: u32,
    /// Trusted as given; never recomputed from `score`
    pub success: bool,
    pub xp_earned: u32,
}

impl GameResult {
    pub fn success(score: u32, time_spent_seconds: u32, xp_earned: u32) -> Self {
        Self {
            score,
            time_spent_seconds,
            success: true,
            xp_earned,
        }
    }

    pub fn failure(score: u32, time_spent_seconds: u32) -> Self {
        Self {
            score,
            time_spent_seconds,
            success: false,
            xp_earned: 0,
        }
    }
}

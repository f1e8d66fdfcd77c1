//! Game session lifecycle: start, complete (success or retry), exit.

use skillquest_domain::{GameResult, GameSession, LevelId, Stage};

use super::{LevelOutcome, ProgressionEngine, ProgressionError};

/// What a reported game result did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    /// The game passed: the level is completed and the session is cleared.
    Completed {
        session: GameSession,
        level: LevelOutcome,
    },
    /// The game failed: counters were updated and the session stays active.
    Retry { session: GameSession },
}

impl ProgressionEngine {
    /// Open the level's game session, resuming the existing one for the
    /// same level so `attempts` and `best_score` carry over.
    ///
    /// A live session for a different level is replaced.
    pub fn start_game(&mut self, level_id: &LevelId) -> Result<GameSession, ProgressionError> {
        let level = self.require_level(level_id, "start_game")?;

        let Some(config) = level.game_config.as_ref() else {
            tracing::error!(%level_id, "Level has no game configured");
            return Err(ProgressionError::NoGameConfig(level_id.clone()));
        };

        let stage = level.current_stage();
        if !stage.is_game() {
            tracing::warn!(%level_id, %stage, "Games start only in a game stage");
            return Err(ProgressionError::WrongStageForGame {
                level_id: level_id.clone(),
                stage,
            });
        }
        let game_id = config.game_id.clone();

        let progress = self.store.progress_mut();
        let session = match progress.take_current_game() {
            Some(existing) if &existing.level_id == level_id => {
                tracing::debug!(
                    %level_id,
                    attempts = existing.attempts,
                    best_score = existing.best_score,
                    "Resuming game session"
                );
                existing.resume()
            }
            Some(abandoned) => {
                tracing::debug!(
                    abandoned_level = %abandoned.level_id,
                    %level_id,
                    "Replacing game session for another level"
                );
                GameSession::new(level_id.clone(), game_id)
            }
            None => GameSession::new(level_id.clone(), game_id),
        };

        progress.set_current_game(Some(session.clone()));
        tracing::info!(%level_id, game_id = %session.game_id, "Game started");
        Ok(session)
    }

    /// Fold a game result into the active session.
    ///
    /// On success the session is marked completed, the level is completed
    /// with `result.xp_earned`, the stage moves to `complete`, and the
    /// session is cleared. On failure only the counters change.
    pub fn complete_game(
        &mut self,
        level_id: &LevelId,
        result: GameResult,
    ) -> Result<GameOutcome, ProgressionError> {
        match self.store.progress().current_game() {
            None => {
                tracing::error!(%level_id, "complete_game called without an active session");
                return Err(ProgressionError::NoActiveSession);
            }
            Some(session) if &session.level_id != level_id => {
                tracing::error!(
                    active = %session.level_id,
                    requested = %level_id,
                    "complete_game called for a level without the active session"
                );
                return Err(ProgressionError::SessionLevelMismatch {
                    active: session.level_id.clone(),
                    requested: level_id.clone(),
                });
            }
            Some(_) => {}
        }
        self.require_level(level_id, "complete_game")?;

        let Some(session) = self.store.progress_mut().current_game_mut() else {
            return Err(ProgressionError::NoActiveSession);
        };
        session.record_attempt(&result);

        if !result.success {
            let session = session.clone();
            tracing::info!(
                %level_id,
                score = result.score,
                attempts = session.attempts,
                best_score = session.best_score,
                "Game attempt failed, session kept for retry"
            );
            return Ok(GameOutcome::Retry { session });
        }

        session.completed = true;
        let level = self.complete_level(level_id, result.xp_earned)?;

        // Game stages always precede `complete`, so this only fails if the
        // level was already moved there by hand.
        if let Err(e) = self.advance_stage(level_id, Stage::Complete) {
            tracing::debug!(%level_id, error = %e, "Stage not advanced after game success");
        }

        let Some(session) = self.store.progress_mut().take_current_game() else {
            return Err(ProgressionError::NoActiveSession);
        };
        tracing::info!(
            %level_id,
            score = result.score,
            attempts = session.attempts,
            "Game completed"
        );

        Ok(GameOutcome::Completed { session, level })
    }

    /// The learner left the game without finishing. The session stays as is
    /// so a later `start_game` resumes it.
    pub fn exit_game(&self) -> Option<&GameSession> {
        let session = self.current_game();
        match session {
            Some(session) => tracing::debug!(
                level_id = %session.level_id,
                attempts = session.attempts,
                "Game exited, session kept"
            ),
            None => tracing::debug!("Game exited with no active session"),
        }
        session
    }
}

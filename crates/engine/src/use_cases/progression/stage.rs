//! Stage transitions.

use skillquest_domain::{validate_transition, LevelId, Stage, TransitionKind};

use super::{ProgressionEngine, ProgressionError};

impl ProgressionEngine {
    /// Move a level to `new_stage` if the transition rules allow it.
    ///
    /// Accepted: strictly forward moves, `practice-game → complete` on a
    /// level without resources, and a restart to `narrative` from anywhere
    /// except `teaching-game`. Everything else is rejected unchanged.
    pub fn advance_stage(
        &mut self,
        level_id: &LevelId,
        new_stage: Stage,
    ) -> Result<TransitionKind, ProgressionError> {
        let level = self.require_level(level_id, "advance_stage")?;
        let current = level.current_stage();

        let kind = validate_transition(current, new_stage, level.has_external_resources())
            .map_err(|rejection| {
                tracing::warn!(
                    %level_id,
                    from = %current,
                    to = %new_stage,
                    reason = %rejection,
                    "Rejected stage transition"
                );
                ProgressionError::InvalidTransition {
                    level_id: level_id.clone(),
                    rejection,
                }
            })?;

        self.store.catalog_mut().set_stage(level_id, new_stage);
        tracing::debug!(%level_id, from = %current, to = %new_stage, ?kind, "Stage advanced");
        Ok(kind)
    }

    /// Advance to the next stage on the level's own stage path.
    pub fn advance_to_next_stage(&mut self, level_id: &LevelId) -> Result<Stage, ProgressionError> {
        let level = self.require_level(level_id, "advance_to_next_stage")?;
        let next = level.next_stage().ok_or_else(|| {
            tracing::warn!(%level_id, "Level has no stage after complete");
            ProgressionError::NoNextStage(level_id.clone())
        })?;

        self.advance_stage(level_id, next)?;
        Ok(next)
    }

    /// Step back one stage on the level's stage path.
    ///
    /// Navigation only: the game session, XP and completion flags are left
    /// as they are.
    pub fn go_back_stage(&mut self, level_id: &LevelId) -> Result<Stage, ProgressionError> {
        let level = self.require_level(level_id, "go_back_stage")?;
        let current = level.current_stage();
        let previous = level.previous_stage().ok_or_else(|| {
            tracing::warn!(%level_id, "Level is already at its first stage");
            ProgressionError::NoPreviousStage(level_id.clone())
        })?;

        self.store.catalog_mut().set_stage(level_id, previous);
        tracing::debug!(%level_id, from = %current, to = %previous, "Stage stepped back");
        Ok(previous)
    }
}

//! Progression error taxonomy.

use skillquest_domain::{BadgeId, LevelId, Stage, TransitionRejection};

/// Why a progression operation did nothing.
///
/// None of these are fatal: the state is unchanged and the caller may
/// re-check and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("Level not found: {0}")]
    LevelNotFound(LevelId),

    #[error("Invalid stage transition for level {level_id}: {rejection}")]
    InvalidTransition {
        level_id: LevelId,
        rejection: TransitionRejection,
    },

    #[error("Level {0} has no further stage")]
    NoNextStage(LevelId),

    #[error("Level {0} is already at its first stage")]
    NoPreviousStage(LevelId),

    #[error("Level {0} is locked")]
    LevelLocked(LevelId),

    #[error("Level {0} has no game configured")]
    NoGameConfig(LevelId),

    #[error("Level {level_id} is in stage {stage}; games start only in teaching-game or practice-game")]
    WrongStageForGame { level_id: LevelId, stage: Stage },

    #[error("No active game session")]
    NoActiveSession,

    #[error("Active game session belongs to level {active}, not {requested}")]
    SessionLevelMismatch { active: LevelId, requested: LevelId },

    #[error("Badge already earned: {0}")]
    BadgeAlreadyEarned(BadgeId),

    #[error("No progress service configured")]
    Offline,

    #[error("Progress sync failed: {0}")]
    SyncFailed(String),
}

impl ProgressionError {
    /// Programming errors in the caller, as opposed to ordinary rejections
    /// of a request the current state does not allow.
    pub fn is_caller_misuse(&self) -> bool {
        matches!(
            self,
            Self::LevelNotFound(_)
                | Self::NoGameConfig(_)
                | Self::WrongStageForGame { .. }
                | Self::NoActiveSession
                | Self::SessionLevelMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_caller_misuse() {
        assert!(ProgressionError::LevelNotFound("x".into()).is_caller_misuse());
        assert!(ProgressionError::NoActiveSession.is_caller_misuse());
        assert!(!ProgressionError::InvalidTransition {
            level_id: "dsa-1".into(),
            rejection: TransitionRejection::SameStage(Stage::Narrative),
        }
        .is_caller_misuse());
        assert!(!ProgressionError::SyncFailed("timeout".to_string()).is_caller_misuse());
    }

    #[test]
    fn messages_name_the_level() {
        let err = ProgressionError::WrongStageForGame {
            level_id: "dsa-1".into(),
            stage: Stage::Assessment,
        };
        assert!(err.to_string().contains("dsa-1"));
        assert!(err.to_string().contains("assessment"));
    }
}

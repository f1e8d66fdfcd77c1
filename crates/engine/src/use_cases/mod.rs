//! Use cases - User story orchestration.
//!
//! `progression` is the level-progression state machine: stage transitions,
//! game sessions, level completion, badges and sync with the progress service.

pub mod progression;

pub use progression::{
    GameOutcome, LevelOutcome, ProgressionEngine, ProgressionError, SyncSummary,
};

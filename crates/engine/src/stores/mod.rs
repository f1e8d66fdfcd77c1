//! In-memory state storage modules.
//!
//! - `LearningStore` - catalog snapshot and cached user progress

pub mod learning;

pub use learning::{LearningSnapshot, LearningStore, RestoreReport, SNAPSHOT_VERSION};

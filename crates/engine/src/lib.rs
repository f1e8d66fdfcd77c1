//! SkillQuest Engine library.
//!
//! The level-progression engine of the SkillQuest learning platform.
//!
//! ## Structure
//!
//! - `use_cases/` - The progression state machine
//! - `stores/` - In-memory learning state and its snapshot format
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Test fixtures module for unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
pub use config::AppConfig;

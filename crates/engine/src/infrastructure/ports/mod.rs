//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The remote progress service (HTTP today)
//! - Local snapshot storage (JSON file today)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::ProgressServicePort;

// =============================================================================
// Storage Ports
// =============================================================================
pub use repos::SnapshotRepo;

// =============================================================================
// Types
// =============================================================================
pub use types::{LevelCompletionRecord, ProgressUpdate, RemoteProgress};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockProgressServicePort;
#[cfg(test)]
pub use repos::MockSnapshotRepo;
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ProgressServiceError, SnapshotError};

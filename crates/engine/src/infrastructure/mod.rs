//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod catalog_loader;
pub mod clock;
pub mod ports;
pub mod progress_http;
pub mod resilient_progress;
pub mod snapshot_file;
pub mod sync_worker;

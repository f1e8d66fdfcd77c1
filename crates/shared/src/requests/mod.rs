//! Request bodies sent to the progress service.

mod progress;

pub use progress::{CompleteLevelRequest, EarnBadgeRequest, UpdateProgressRequest};

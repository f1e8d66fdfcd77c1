//! SkillQuest Shared - Wire contract for the progress service
//!
//! Request and response bodies exchanged between the progression engine and
//! the remote progress service:
//!
//! | Operation | Method | Path | Body |
//! |-----------|--------|------|------|
//! | fetch progress | `GET` | `/progress/{userId}` | → [`ProgressResponse`] |
//! | update progress | `PUT` | `/progress/{userId}` | [`UpdateProgressRequest`] |
//! | complete level | `POST` | `/progress/{userId}/complete-level` | [`CompleteLevelRequest`] |
//! | earn badge | `POST` | `/progress/{userId}/badges` | [`EarnBadgeRequest`] |
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - raw strings in DTOs

pub mod requests;
pub mod responses;

pub use requests::{CompleteLevelRequest, EarnBadgeRequest, UpdateProgressRequest};
pub use responses::{BadgeData, CompletedLevelEntry, ErrorResponse, ProgressResponse};

//! Response bodies returned by the progress service.

use serde::{Deserialize, Serialize};

/// `GET /progress/{userId}` - the authoritative progress snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    #[serde(rename = "totalXP", default)]
    pub total_xp: u32,
    /// Informational; clients recompute the level from `total_xp`
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub current_course: Option<String>,
    #[serde(default)]
    pub current_level: Option<String>,
    #[serde(default)]
    pub completed_levels: Vec<CompletedLevelEntry>,
    #[serde(default)]
    pub badges: Vec<BadgeData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLevelEntry {
    pub level_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_earned: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeData {
    pub badge_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub rarity: String,
    /// RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "message")]
    pub error: String,
}

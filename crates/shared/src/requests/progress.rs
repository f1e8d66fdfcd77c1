use serde::{Deserialize, Serialize};

/// `PUT /progress/{userId}` - progress snapshot update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[serde(rename = "totalXP")]
    pub total_xp: u32,
    pub level: u32,
    #[serde(default)]
    pub current_course: Option<String>,
    #[serde(default)]
    pub current_level: Option<String>,
}

/// `POST /progress/{userId}/complete-level` - one completed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLevelRequest {
    pub level_id: String,
    pub course_id: String,
    pub xp_earned: u32,
}

/// `POST /progress/{userId}/badges` - one earned badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnBadgeRequest {
    pub badge_id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub rarity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_progress_uses_service_field_names() {
        let body = UpdateProgressRequest {
            total_xp: 600,
            level: 2,
            current_course: Some("dsa".to_string()),
            current_level: None,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["totalXP"], 600);
        assert_eq!(json["currentCourse"], "dsa");
        assert!(json["currentLevel"].is_null());
    }

    #[test]
    fn complete_level_is_camel_case() {
        let body = CompleteLevelRequest {
            level_id: "dsa-1".to_string(),
            course_id: "dsa".to_string(),
            xp_earned: 100,
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert_eq!(
            json,
            r#"{"levelId":"dsa-1","courseId":"dsa","xpEarned":100}"#
        );
    }
}

//! Badge entity - Achievements recorded on a learner's progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::BadgeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl std::fmt::Display for BadgeRarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadgeRarity::Common => write!(f, "common"),
            BadgeRarity::Rare => write!(f, "rare"),
            BadgeRarity::Epic => write!(f, "epic"),
            BadgeRarity::Legendary => write!(f, "legendary"),
        }
    }
}

/// Badge definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub rarity: BadgeRarity,
}

impl Badge {
    pub fn new(id: impl Into<BadgeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            rarity: BadgeRarity::Common,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_rarity(mut self, rarity: BadgeRarity) -> Self {
        self.rarity = rarity;
        self
    }
}

/// A badge held by a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub badge: Badge,
    /// Absent for badges adopted from a remote snapshot without a timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<DateTime<Utc>>,
}

//! HTTP client for the progress service

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, Url};
use std::time::Duration;

use skillquest_domain::{Badge, BadgeRarity, EarnedBadge, UserId};
use skillquest_shared::{
    BadgeData, CompleteLevelRequest, EarnBadgeRequest, ErrorResponse, ProgressResponse,
    UpdateProgressRequest,
};

use crate::infrastructure::ports::{
    LevelCompletionRecord, ProgressServiceError, ProgressServicePort, ProgressUpdate,
    RemoteProgress,
};

/// Default progress service base URL.
pub const DEFAULT_PROGRESS_BASE_URL: &str = "http://localhost:5000/api";

/// Client for the progress service's REST API
#[derive(Clone)]
pub struct HttpProgressService {
    client: Client,
    base_url: String,
}

impl HttpProgressService {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/progress/{userId}` followed by `tail`, with every segment
    /// percent-encoded.
    fn progress_url(&self, user_id: &UserId, tail: &[&str]) -> Result<Url, ProgressServiceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProgressServiceError::request(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProgressServiceError::request("base URL cannot carry a path"))?
            .pop_if_empty()
            .push("progress")
            .push(user_id.as_str())
            .extend(tail);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, ProgressServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(ProgressServiceError::request)?;
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|err| err.error)
            .unwrap_or(body);
        Err(ProgressServiceError::status(status.as_u16(), message))
    }
}

impl Default for HttpProgressService {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_BASE_URL, Duration::from_secs(15))
    }
}

#[async_trait]
impl ProgressServicePort for HttpProgressService {
    async fn fetch_progress(&self, user_id: &UserId) -> Result<RemoteProgress, ProgressServiceError> {
        let response = self
            .client
            .get(self.progress_url(user_id, &[])?)
            .send()
            .await
            .map_err(ProgressServiceError::request)?;

        let body: ProgressResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(ProgressServiceError::invalid_response)?;

        Ok(convert_progress(body))
    }

    async fn update_progress(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), ProgressServiceError> {
        let body = UpdateProgressRequest {
            total_xp: update.total_xp,
            level: update.level,
            current_course: update.current_course.as_ref().map(ToString::to_string),
            current_level: update.current_level.as_ref().map(ToString::to_string),
        };

        let response = self
            .client
            .put(self.progress_url(user_id, &[])?)
            .json(&body)
            .send()
            .await
            .map_err(ProgressServiceError::request)?;
        Self::check(response).await.map(|_| ())
    }

    async fn complete_level(
        &self,
        user_id: &UserId,
        record: &LevelCompletionRecord,
    ) -> Result<(), ProgressServiceError> {
        let body = CompleteLevelRequest {
            level_id: record.level_id.to_string(),
            course_id: record.course_id.to_string(),
            xp_earned: record.xp_earned,
        };

        let response = self
            .client
            .post(self.progress_url(user_id, &["complete-level"])?)
            .json(&body)
            .send()
            .await
            .map_err(ProgressServiceError::request)?;
        Self::check(response).await.map(|_| ())
    }

    async fn earn_badge(&self, user_id: &UserId, badge: &Badge) -> Result<(), ProgressServiceError> {
        let body = EarnBadgeRequest {
            badge_id: badge.id.to_string(),
            name: badge.name.clone(),
            description: badge.description.clone(),
            icon: badge.icon.clone(),
            rarity: badge.rarity.to_string(),
        };

        let response = self
            .client
            .post(self.progress_url(user_id, &["badges"])?)
            .json(&body)
            .send()
            .await
            .map_err(ProgressServiceError::request)?;
        Self::check(response).await.map(|_| ())
    }
}

// =============================================================================
// Wire → domain conversion
// =============================================================================

fn convert_progress(body: ProgressResponse) -> RemoteProgress {
    RemoteProgress {
        total_xp: body.total_xp,
        current_course: body.current_course.map(Into::into),
        current_level: body.current_level.map(Into::into),
        completed_levels: body
            .completed_levels
            .into_iter()
            .map(|entry| entry.level_id.into())
            .collect(),
        badges: body.badges.into_iter().map(convert_badge).collect(),
    }
}

fn convert_badge(data: BadgeData) -> EarnedBadge {
    let earned_at = data
        .earned_at
        .as_deref()
        .and_then(|raw| match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(raw, error = %e, "Ignoring unparseable badge timestamp");
                None
            }
        });

    EarnedBadge {
        badge: Badge::new(data.badge_id, data.name)
            .with_description(data.description)
            .with_icon(data.icon)
            .with_rarity(parse_rarity(&data.rarity)),
        earned_at,
    }
}

fn parse_rarity(raw: &str) -> BadgeRarity {
    match raw.to_ascii_lowercase().as_str() {
        "rare" => BadgeRarity::Rare,
        "epic" => BadgeRarity::Epic,
        "legendary" => BadgeRarity::Legendary,
        _ => BadgeRarity::Common,
    }
}

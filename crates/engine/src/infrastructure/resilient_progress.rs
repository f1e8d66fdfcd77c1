//! Resilient progress service wrapper with exponential backoff retry
//!
//! Wraps any ProgressServicePort implementation with retry logic so that
//! transient network failures during replication do not lose events.

use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use skillquest_domain::{Badge, UserId};

use crate::infrastructure::ports::{
    LevelCompletionRecord, ProgressServiceError, ProgressServicePort, ProgressUpdate,
    RemoteProgress,
};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays to prevent thundering herd
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            jitter_factor: 0.2,
        }
    }
}

/// Wrapper that adds retry logic to any progress service client
pub struct ResilientProgressService {
    inner: Arc<dyn ProgressServicePort>,
    config: RetryConfig,
}

impl ResilientProgressService {
    /// Create a new resilient wrapper around an existing client
    pub fn new(inner: Arc<dyn ProgressServicePort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Calculate delay for a given attempt number using exponential backoff with jitter
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        // Exponential: base * 2^(attempt-1)
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        // Add jitter: ±jitter_factor around the delay
        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    async fn execute_with_retry<T, F, Fut>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, ProgressServiceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ProgressServiceError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            operation = operation_name,
                            "Progress service call succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::error!(
                        error = %e,
                        operation = operation_name,
                        "Progress service call failed with non-retryable error"
                    );
                    return Err(e);
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.calculate_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay,
                        error = %e,
                        operation = operation_name,
                        "Progress service call failed, retrying..."
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    tracing::error!(
                        attempts = self.config.max_retries + 1,
                        error = %e,
                        operation = operation_name,
                        "Progress service call failed after all retry attempts"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl ProgressServicePort for ResilientProgressService {
    async fn fetch_progress(&self, user_id: &UserId) -> Result<RemoteProgress, ProgressServiceError> {
        self.execute_with_retry("fetch_progress", || self.inner.fetch_progress(user_id))
            .await
    }

    async fn update_progress(
        &self,
        user_id: &UserId,
        update: &ProgressUpdate,
    ) -> Result<(), ProgressServiceError> {
        self.execute_with_retry("update_progress", || {
            self.inner.update_progress(user_id, update)
        })
        .await
    }

    async fn complete_level(
        &self,
        user_id: &UserId,
        record: &LevelCompletionRecord,
    ) -> Result<(), ProgressServiceError> {
        self.execute_with_retry("complete_level", || {
            self.inner.complete_level(user_id, record)
        })
        .await
    }

    async fn earn_badge(&self, user_id: &UserId, badge: &Badge) -> Result<(), ProgressServiceError> {
        self.execute_with_retry("earn_badge", || self.inner.earn_badge(user_id, badge))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Service that fails a configurable number of times before succeeding
    struct FailingService {
        failures_remaining: AtomicU32,
        calls: AtomicU32,
        error: ProgressServiceError,
    }

    impl FailingService {
        fn new(failure_count: u32, error: ProgressServiceError) -> Self {
            Self {
                failures_remaining: AtomicU32::new(failure_count),
                calls: AtomicU32::new(0),
                error,
            }
        }

        fn attempt(&self) -> Result<(), ProgressServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                Err(self.error.clone())
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProgressServicePort for FailingService {
        async fn fetch_progress(
            &self,
            _user_id: &UserId,
        ) -> Result<RemoteProgress, ProgressServiceError> {
            self.attempt().map(|_| RemoteProgress::default())
        }

        async fn update_progress(
            &self,
            _user_id: &UserId,
            _update: &ProgressUpdate,
        ) -> Result<(), ProgressServiceError> {
            self.attempt()
        }

        async fn complete_level(
            &self,
            _user_id: &UserId,
            _record: &LevelCompletionRecord,
        ) -> Result<(), ProgressServiceError> {
            self.attempt()
        }

        async fn earn_badge(
            &self,
            _user_id: &UserId,
            _badge: &Badge,
        ) -> Result<(), ProgressServiceError> {
            self.attempt()
        }
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
            jitter_factor: 0.0,
        }
    }

    fn record() -> LevelCompletionRecord {
        LevelCompletionRecord {
            level_id: "dsa-1".into(),
            course_id: "dsa".into(),
            xp_earned: 100,
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let inner = Arc::new(FailingService::new(
            2,
            ProgressServiceError::request("connection reset"),
        ));
        let client = ResilientProgressService::new(inner.clone(), fast_config(3));

        let result = client.complete_level(&"u-1".into(), &record()).await;

        assert!(result.is_ok());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let inner = Arc::new(FailingService::new(
            10,
            ProgressServiceError::status(503, "unavailable"),
        ));
        let client = ResilientProgressService::new(inner.clone(), fast_config(2));

        let result = client.earn_badge(&"u-1".into(), &Badge::new("b", "B")).await;

        assert!(matches!(
            result,
            Err(ProgressServiceError::Status { status: 503, .. })
        ));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let inner = Arc::new(FailingService::new(
            1,
            ProgressServiceError::status(400, "bad request"),
        ));
        let client = ResilientProgressService::new(inner.clone(), fast_config(3));

        assert!(client.fetch_progress(&"u-1".into()).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delay_is_exponential_and_capped() {
        let client = ResilientProgressService::new(
            Arc::new(FailingService::new(0, ProgressServiceError::request("x"))),
            RetryConfig {
                max_retries: 5,
                base_delay_ms: 100,
                max_delay_ms: 350,
                jitter_factor: 0.0,
            },
        );
        assert_eq!(client.calculate_delay(1), 100);
        assert_eq!(client.calculate_delay(2), 200);
        assert_eq!(client.calculate_delay(3), 350);
    }
}

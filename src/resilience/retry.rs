//! Retry Logic
//!
//! Bounded retry of idempotent reads. Status polls use a single immediate
//! retry so one dropped connection does not cost a poll attempt.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::SantanderError;

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    /// Delay before each repeat.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        STATUS_READ_RETRY_CONFIG
    }
}

/// One retry, immediately.
pub const STATUS_READ_RETRY_CONFIG: RetryConfig = RetryConfig {
    max_attempts: 2,
    delay: Duration::ZERO,
};

/// Retry executor interface.
#[async_trait]
pub trait RetryExecutor: Send + Sync {
    /// Execute an operation with retry logic.
    async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, SantanderError>
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, SantanderError>> + Send;

    /// Check if an error is retryable.
    fn is_retryable(&self, error: &SantanderError) -> bool;

    /// Get retry statistics.
    fn get_stats(&self) -> RetryStats;
}

/// Retry statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryStats {
    pub total_attempts: u32,
    pub successful_retries: u32,
    pub failed_operations: u32,
}

/// Retry executor for Santander reads.
#[derive(Debug)]
pub struct SantanderRetryExecutor {
    config: RetryConfig,
    stats: Mutex<RetryStats>,
}

impl SantanderRetryExecutor {
    /// Create new retry executor.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            stats: Mutex::new(RetryStats::default()),
        }
    }

    fn record(&self, update: impl FnOnce(&mut RetryStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }
}

impl Default for SantanderRetryExecutor {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

#[async_trait]
impl RetryExecutor for SantanderRetryExecutor {
    async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, SantanderError>
    where
        T: Send,
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, SantanderError>> + Send,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.record(|s| s.total_attempts += 1);

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        self.record(|s| s.successful_retries += 1);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !self.is_retryable(&error) || attempt >= max_attempts {
                        self.record(|s| s.failed_operations += 1);
                        return Err(error);
                    }

                    tracing::warn!(
                        attempt,
                        error_code = error.error_code(),
                        error = %error,
                        "retrying after request failure"
                    );
                    if !self.config.delay.is_zero() {
                        tokio::time::sleep(self.config.delay).await;
                    }
                }
            }
        }
    }

    fn is_retryable(&self, error: &SantanderError) -> bool {
        error.is_retryable()
    }

    fn get_stats(&self) -> RetryStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }
}

/// Create the status-read retry executor.
pub fn create_retry_executor() -> SantanderRetryExecutor {
    SantanderRetryExecutor::default()
}

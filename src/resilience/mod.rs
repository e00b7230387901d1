//! Resilience
//!
//! Retry policy for status reads.

pub mod retry;

pub use retry::{
    create_retry_executor, RetryConfig, RetryExecutor, RetryStats, SantanderRetryExecutor,
    STATUS_READ_RETRY_CONFIG,
};

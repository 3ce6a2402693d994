//! Client configuration.

use std::time::Duration;

use crate::retry::{BackoffStrategy, RetryPolicy};

/// Maximum accepted upload size: 100 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Configuration for the collaborator clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL for the single collaborator endpoint.
    pub endpoint: String,
    /// Total attempts per exchange.
    pub max_attempts: u32,
    /// Base delay of the linear backoff.
    pub base_delay: Duration,
    /// Maximum accepted upload payload in bytes.
    pub max_file_size: usize,
}

impl ClientConfig {
    /// Create a configuration with production defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the base retry delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the upload size limit.
    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Retry policy derived from this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts).with_backoff(BackoffStrategy::Linear {
            base: self.base_delay,
        })
    }
}

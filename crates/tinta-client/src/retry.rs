//! Retry policies for collaborator exchanges.

use std::time::Duration;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Delay grows linearly with the attempt number.
    Linear {
        /// Delay after the first failed attempt; attempt k waits k times this.
        base: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate the delay after a given failed attempt (1-indexed).
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Linear { base } => {
                Duration::from_millis((base.as_millis() as u64).saturating_mul(attempt as u64))
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Linear {
            base: Duration::from_secs(1),
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
}

impl RetryPolicy {
    /// Create a new retry policy with the default linear backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: BackoffStrategy::default(),
        }
    }

    /// Create a policy that tries exactly once.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: BackoffStrategy::None,
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Delay to sleep after a failed attempt (1-indexed), if another
    /// attempt remains.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.delay_after_attempt(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// The three exchanges the storefront performs, with per-exchange defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeTag {
    /// Document upload.
    Upload,
    /// Price quote.
    Pricing,
    /// Order submission.
    Order,
}

impl ExchangeTag {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Pricing => "pricing",
            Self::Order => "order",
        }
    }

    /// Default attempt budget for this exchange.
    pub fn default_max_attempts(&self) -> u32 {
        3
    }

    /// Default policy for this exchange.
    pub fn default_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.default_max_attempts())
    }
}

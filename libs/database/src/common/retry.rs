use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff settings for retried operations.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial try
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound on the delay between retries in milliseconds
    pub max_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    pub backoff_multiplier: f64,

    /// Randomize each delay to avoid synchronized retries
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Default configuration: 3 retries starting at 100ms, capped at 5s.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }
}

/// Run an async operation, retrying failures with exponential backoff.
///
/// Returns the first `Ok` result, or the last error once `max_retries`
/// is exhausted.
///
/// # Example
/// ```ignore
/// use database::common::retry::{RetryConfig, retry_with_backoff};
///
/// let config = RetryConfig::new().with_max_retries(5);
/// let db = retry_with_backoff(|| database::postgres::connect(&url), config).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut tries = 0;
    let mut base_delay_ms = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(value) => {
                if tries > 0 {
                    debug!("Succeeded on retry {} of {}", tries, config.max_retries);
                }
                return Ok(value);
            }
            Err(e) if tries >= config.max_retries => {
                warn!("Giving up after {} retries: {}", config.max_retries, e);
                return Err(e);
            }
            Err(e) => {
                tries += 1;
                let wait_ms = if config.use_jitter {
                    jittered(base_delay_ms)
                } else {
                    base_delay_ms
                };
                debug!(
                    "Attempt {} failed ({}), next try in {}ms",
                    tries, e, wait_ms
                );
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;

                let next = (base_delay_ms as f64 * config.backoff_multiplier) as u64;
                base_delay_ms = next.min(config.max_delay_ms);
            }
        }
    }
}

/// Retry with the default configuration.
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}

/// Scale a delay by a pseudo-random factor between 0.5 and 1.0.
fn jittered(delay_ms: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let seed = RandomState::new().hash_one(std::time::SystemTime::now());
    let factor = 0.5 + (seed % 50) as f64 / 100.0;
    (delay_ms as f64 * factor) as u64
}

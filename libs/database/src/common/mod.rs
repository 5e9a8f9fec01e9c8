//! Shared utilities for database backends.

pub mod retry;

pub use retry::{RetryConfig, retry, retry_with_backoff};

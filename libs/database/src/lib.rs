//! Database connectivity for the workspace.
//!
//! Provides PostgreSQL connection management built on sea-orm, with
//! environment-driven configuration and retry-with-backoff connection
//! establishment shared by all services.

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::retry::{RetryConfig, retry, retry_with_backoff};

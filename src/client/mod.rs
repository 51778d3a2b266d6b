//! API client, rate-limit backoff and the request executor.
//!
//! This module provides the [`ApiClient`] for requesting single pages,
//! the [`RequestExecutor`] that retries rate-limited requests, and the
//! [`Auth`] credential type.

mod api;
mod auth;
mod backoff;
mod executor;

pub use api::{ApiClient, FetchOutcome};
pub use auth::Auth;
pub use backoff::{DEFAULT_RETRY_AFTER, RetryPolicy, Sleeper, TokioSleeper, retry_after};
pub use executor::RequestExecutor;

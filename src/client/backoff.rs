//! Rate-limit backoff: retry policy, `Retry-After` parsing and sleeping

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::future::Future;
use std::time::Duration;

/// Wait used when a 429 response carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// How long to keep retrying rate-limited requests.
///
/// The default retries forever and waits exactly as long as the server asks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Give up after this many rate-limit retries of one request
    pub max_retries: Option<u32>,
    /// Never wait longer than this between retries
    pub max_wait: Option<Duration>,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Whether a request that has already been retried `retries` times
    /// may be retried again.
    pub fn allows_retry(&self, retries: u32) -> bool {
        self.max_retries.is_none_or(|max| retries < max)
    }

    /// Cap a server-requested delay at `max_wait`.
    pub fn wait_for(&self, requested: Duration) -> Duration {
        match self.max_wait {
            Some(max) => requested.min(max),
            None => requested,
        }
    }
}

/// Read the `Retry-After` header as a whole number of seconds.
///
/// Falls back to [`DEFAULT_RETRY_AFTER`] when the header is missing or is
/// not an integer (HTTP-date values included).
pub fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Blocking wait between rate-limited attempts.
///
/// Injectable so tests can record waits instead of sleeping.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await
    }
}

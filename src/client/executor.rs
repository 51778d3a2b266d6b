//! Request executor: one logical page fetch with rate-limit retries

use super::{ApiClient, Auth, FetchOutcome, RetryPolicy, Sleeper, TokioSleeper};
use crate::config::Config;
use crate::etl::{Cursor, Extractor, Page};
use eyre::Result;

/// Fetches pages through an [`ApiClient`], absorbing 429 responses.
///
/// A rate-limited request is retried unchanged after waiting as long as the
/// server asked, for as long as the [`RetryPolicy`] allows. Bad requests and
/// other non-200 statuses are logged and reported as `None`, which tells the
/// pipeline to stop the current method. Transport failures propagate.
pub struct RequestExecutor<S = TokioSleeper> {
    client: ApiClient,
    policy: RetryPolicy,
    sleeper: S,
}

impl RequestExecutor<TokioSleeper> {
    /// Build an executor that sleeps on the tokio timer
    pub fn try_new(config: &Config) -> Result<Self> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> RequestExecutor<S> {
    /// Build an executor with a custom sleeper
    pub fn with_sleeper(config: &Config, sleeper: S) -> Result<Self> {
        let client = ApiClient::try_new(
            config.url.clone(),
            Auth::new(config.api_key.clone()),
            config.limit,
        )?;
        Ok(Self::from_client(client, config.retry, sleeper))
    }

    pub fn from_client(client: ApiClient, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            client,
            policy,
            sleeper,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch the page of `method` after `cursor`
    ///
    /// Returns `None` when the method should not be extracted any further.
    ///
    /// # Errors
    /// Returns an error on transport failures or an undecodable page
    pub async fn fetch(&self, method: &str, cursor: Option<&Cursor>) -> Result<Option<Page>> {
        let mut retries = 0;
        loop {
            match self.client.get_page(method, cursor).await? {
                FetchOutcome::Page(page) => return Ok(Some(page)),
                FetchOutcome::RateLimited(requested) => {
                    if !self.policy.allows_retry(retries) {
                        log::error!(
                            "Still rate limited after {} retries for method: {}, giving up",
                            retries,
                            method
                        );
                        return Ok(None);
                    }
                    let wait = self.policy.wait_for(requested);
                    log::warn!(
                        "Rate limited. Retrying in {} seconds for method: {}",
                        wait.as_secs_f64(),
                        method
                    );
                    self.sleeper.sleep(wait).await;
                    retries += 1;
                }
                FetchOutcome::BadRequest(body) => {
                    log::warn!("Bad request for method: {}. Message: {}", method, body);
                    return Ok(None);
                }
                FetchOutcome::Failed(status) => {
                    log::error!(
                        "Failed to fetch data for method: {}. Status: {}",
                        method,
                        status
                    );
                    return Ok(None);
                }
            }
        }
    }
}

impl<S: Sleeper> Extractor for RequestExecutor<S> {
    async fn extract(&self, method: &str, cursor: Option<&Cursor>) -> Result<Option<Page>> {
        self.fetch(method, cursor).await
    }
}

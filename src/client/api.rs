//! API client module
//!
//! Provides `ApiClient` for requesting single pages from list endpoints
//! laid out as `<base-url>/<method>`.

use super::{Auth, backoff};
use crate::etl::{Cursor, Page, method_segments};
use eyre::{Context, Result, eyre};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Classified response to a single page request.
///
/// Transport failures (DNS, refused connections, undecodable bodies) are not
/// an outcome: they surface as the `Err` side of [`ApiClient::get_page`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// 200 with a decoded page
    Page(Page),
    /// 429, with the wait the server asked for
    RateLimited(Duration),
    /// 400, with the response body
    BadRequest(String),
    /// Any other status
    Failed(StatusCode),
}

/// Client for cursor-paginated list endpoints.
///
/// Every request carries the page size as `limit`, the credential as
/// `apiKey`, and the cursor (if any) as `starting_after`.
///
/// # Example
/// ```no_run
/// use pagex::client::{ApiClient, Auth, FetchOutcome};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://api.example.com/v1")?;
/// let client = ApiClient::try_new(url, Auth::Apikey("sk_test".into()), 100)?;
///
/// if let FetchOutcome::Page(page) = client.get_page("customers", None).await? {
///     println!("{} customer(s), more: {}", page.data.len(), page.has_more);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    url: Url,
    auth: Auth,
    limit: u32,
}

impl ApiClient {
    /// Create a new client from a base URL, credential and page size.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The base URL cannot have path segments appended (e.g. `mailto:`)
    /// - The HTTP client cannot be built
    pub fn try_new(url: Url, auth: Auth, limit: u32) -> Result<Self> {
        if url.cannot_be_a_base() {
            eyre::bail!("API URL cannot be used as a base URL: {}", url);
        }
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            auth,
            limit,
        })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the page size sent as `limit`.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Endpoint URL for a method: the base URL with the method's path
    /// segments appended.
    pub fn method_url(&self, method: &str) -> Result<Url> {
        let segments = method_segments(method)?;
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("API URL cannot be used as a base URL: {}", self.url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request one page of `method` and classify the response.
    ///
    /// # Errors
    /// Returns an error if the request could not be sent or a 200 body is
    /// not a valid page
    pub async fn get_page(&self, method: &str, cursor: Option<&Cursor>) -> Result<FetchOutcome> {
        let url = self.method_url(method)?;

        let limit = self.limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![("limit", limit.as_str())];
        if let Some(pair) = self.auth.query_pair() {
            query.push(pair);
        }
        if let Some(cursor) = cursor {
            query.push(("starting_after", cursor.as_str()));
        }

        log::trace!(
            "GET {} (starting_after: {})",
            url,
            cursor.map(Cursor::as_str).unwrap_or("-")
        );
        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request for method {}: {}", method, e))?;

        let outcome = match response.status() {
            StatusCode::OK => {
                let page: Page = response
                    .json()
                    .await
                    .with_context(|| format!("Failed to parse page for method: {}", method))?;
                FetchOutcome::Page(page)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                FetchOutcome::RateLimited(backoff::retry_after(response.headers()))
            }
            StatusCode::BAD_REQUEST => {
                FetchOutcome::BadRequest(response.text().await.unwrap_or_default())
            }
            status => FetchOutcome::Failed(status),
        };

        Ok(outcome)
    }
}

impl fmt::Display for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (auth: {}, limit: {})", self.url, self.auth, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::try_new(Url::parse(base).unwrap(), Auth::None, 100).unwrap()
    }

    #[test]
    fn test_method_url_root() {
        let client = client("http://localhost:8080");
        assert_eq!(
            client.method_url("customers").unwrap().as_str(),
            "http://localhost:8080/customers"
        );
    }

    #[test]
    fn test_method_url_keeps_base_path() {
        assert_eq!(
            client("https://api.example.com/v1")
                .method_url("customers")
                .unwrap()
                .as_str(),
            "https://api.example.com/v1/customers"
        );
        assert_eq!(
            client("https://api.example.com/v1/")
                .method_url("customers")
                .unwrap()
                .as_str(),
            "https://api.example.com/v1/customers"
        );
    }

    #[test]
    fn test_method_url_nested() {
        assert_eq!(
            client("https://api.example.com/v1")
                .method_url("billing/invoices")
                .unwrap()
                .as_str(),
            "https://api.example.com/v1/billing/invoices"
        );
    }

    #[test]
    fn test_method_url_leading_slash() {
        assert_eq!(
            client("https://api.example.com/v1")
                .method_url("/customers")
                .unwrap()
                .as_str(),
            "https://api.example.com/v1/customers"
        );
        assert!(client("https://api.example.com/v1").method_url("../admin").is_err());
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:ops@example.com").unwrap();
        let result = ApiClient::try_new(url, Auth::None, 100);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_hides_key() {
        let url = Url::parse("https://api.example.com").unwrap();
        let client = ApiClient::try_new(url, Auth::Apikey("secret".to_string()), 50).unwrap();
        let shown = client.to_string();
        assert!(shown.contains("Apikey"));
        assert!(shown.contains("limit: 50"));
        assert!(!shown.contains("secret"));
    }
}

//! Extractor trait for fetching one page of a paginated resource

use super::{Cursor, Page};
use eyre::Result;

/// Extractor trait for fetching pages from a paginated source
///
/// Implementors fetch exactly one page per call. A returned `None` means the
/// source refused the request and extraction of that method should stop;
/// an `Err` is a fatal failure (network, decoding) that ends the whole run.
///
/// # Example
/// ```no_run
/// use pagex::etl::{Cursor, Extractor, Page};
/// use eyre::Result;
///
/// struct SinglePage;
///
/// impl Extractor for SinglePage {
///     async fn extract(&self, _method: &str, _cursor: Option<&Cursor>) -> Result<Option<Page>> {
///         Ok(Some(Page::new(vec![serde_json::json!({"id": 1})], false)))
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Fetch the page of `method` that follows `cursor`
    ///
    /// `cursor` is `None` for the first page.
    ///
    /// # Errors
    /// Returns an error if the request could not be completed or decoded
    fn extract(
        &self,
        method: &str,
        cursor: Option<&Cursor>,
    ) -> impl std::future::Future<Output = Result<Option<Page>>> + Send;
}

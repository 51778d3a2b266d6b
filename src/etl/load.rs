//! Loader trait for persisting extracted records

use eyre::Result;
use serde_json::Value;

/// Loader trait for persisting one page of records for a method
///
/// Every call must leave the destination holding either all of `records`
/// or none of them, appended after anything written before.
///
/// # Example
/// ```no_run
/// use pagex::etl::Loader;
/// use eyre::Result;
/// use serde_json::Value;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     async fn load(&self, _method: &str, records: &[Value]) -> Result<usize> {
///         Ok(records.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// Append `records` to the destination for `method`
    ///
    /// Returns the number of records written
    ///
    /// # Errors
    /// Returns an error if the records could not be serialized or written
    fn load(
        &self,
        method: &str,
        records: &[Value],
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}

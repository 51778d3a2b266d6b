//! Pipeline orchestration for paginated extraction

use super::{Cursor, Extractor, Loader};
use eyre::Result;
use std::fmt;

/// Why extraction of a method ended. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The extractor returned no page (bad request, server error, gave up retrying)
    Rejected,
    /// A page came back with `has_more: false`
    Exhausted,
    /// A page came back with no records
    EmptyPage,
    /// The last record of a page had no usable `id` to continue from
    MissingCursor,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => write!(f, "request rejected"),
            Self::Exhausted => write!(f, "no more pages"),
            Self::EmptyPage => write!(f, "empty page"),
            Self::MissingCursor => write!(f, "missing cursor"),
        }
    }
}

/// Outcome of extracting one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub method: String,
    /// Pages successfully fetched (rejected fetches are not counted)
    pub pages: usize,
    /// Records handed to the loader
    pub records: usize,
    pub stop: StopReason,
}

/// Extraction pipeline that walks every page of a method and loads each one
///
/// Pages are strictly sequential: the cursor for page N+1 comes from page N,
/// and page N is fully loaded before page N+1 is requested.
///
/// # Example
/// ```no_run
/// use pagex::client::RequestExecutor;
/// use pagex::config::Config;
/// use pagex::etl::Pipeline;
/// use pagex::storage::OutputDirectory;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = Config::from_env()?;
/// let pipeline = Pipeline::new(
///     RequestExecutor::try_new(&config)?,
///     OutputDirectory::new(&config.data_folder)?,
/// );
///
/// let summaries = pipeline.run(["customers", "invoices"]).await?;
/// println!("Extracted {} method(s)", summaries.len());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, L> {
    extractor: E,
    loader: L,
}

impl<E, L> Pipeline<E, L>
where
    E: Extractor,
    L: Loader,
{
    /// Create a new pipeline
    pub fn new(extractor: E, loader: L) -> Self {
        Self { extractor, loader }
    }

    /// Extract every method in order, one after another
    ///
    /// A method that stops early (for example on a bad request) does not
    /// affect the methods after it.
    ///
    /// # Errors
    /// Returns the first fatal error; methods after it are not attempted
    pub async fn run<I, S>(&self, methods: I) -> Result<Vec<Summary>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summaries = Vec::new();
        for method in methods {
            summaries.push(self.extract(method.as_ref()).await?);
        }
        Ok(summaries)
    }

    /// Extract all pages of a single method
    ///
    /// Steps, per page:
    /// 1. Fetch the page after the current cursor
    /// 2. Stop if the fetch was rejected or the page is empty
    /// 3. Load the page's records
    /// 4. Stop if the page says there is nothing more
    /// 5. Continue from the last record's `id`
    ///
    /// # Errors
    /// Returns an error if the extractor or loader fails
    pub async fn extract(&self, method: &str) -> Result<Summary> {
        let mut cursor: Option<Cursor> = None;
        let mut pages = 0;
        let mut records = 0;

        let stop = loop {
            log::info!("Extracting page {} for method {}", pages + 1, method);

            let Some(page) = self.extractor.extract(method, cursor.as_ref()).await? else {
                break StopReason::Rejected;
            };
            pages += 1;

            if page.data.is_empty() {
                log::info!("No more data available for method: {}", method);
                break StopReason::EmptyPage;
            }

            records += self.loader.load(method, &page.data).await?;
            log::debug!(
                "Loaded {} record(s) from page {} of {}",
                page.data.len(),
                pages,
                method
            );

            if !page.has_more {
                log::info!("No more data available for method: {}", method);
                break StopReason::Exhausted;
            }

            match page.next_cursor() {
                Some(next) => cursor = Some(next),
                None => {
                    log::error!(
                        "Last record on page {} of {} has no string or integer id, cannot continue",
                        pages,
                        method
                    );
                    break StopReason::MissingCursor;
                }
            }
        };

        Ok(Summary {
            method: method.to_string(),
            pages,
            records,
            stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::Page;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses and records the cursor of every call
    struct ScriptedExtractor {
        pages: Mutex<VecDeque<Option<Page>>>,
        calls: Mutex<Vec<(String, Option<Cursor>)>>,
    }

    impl ScriptedExtractor {
        fn new(pages: Vec<Option<Page>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn cursors(&self) -> Vec<Option<String>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, c)| c.as_ref().map(|c| c.to_string()))
                .collect()
        }
    }

    impl Extractor for ScriptedExtractor {
        async fn extract(&self, method: &str, cursor: Option<&Cursor>) -> Result<Option<Page>> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_string(), cursor.cloned()));
            Ok(self.pages.lock().unwrap().pop_front().flatten())
        }
    }

    #[derive(Default)]
    struct MemoryLoader(Mutex<Vec<(String, Value)>>);

    impl MemoryLoader {
        fn records(&self, method: &str) -> Vec<Value> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| m == method)
                .map(|(_, v)| v.clone())
                .collect()
        }
    }

    impl Loader for MemoryLoader {
        async fn load(&self, method: &str, records: &[Value]) -> Result<usize> {
            let mut store = self.0.lock().unwrap();
            store.extend(records.iter().map(|r| (method.to_string(), r.clone())));
            Ok(records.len())
        }
    }

    fn page(ids: &[i64], has_more: bool) -> Option<Page> {
        Some(Page::new(ids.iter().map(|id| json!({"id": id})).collect(), has_more))
    }

    #[tokio::test]
    async fn test_two_pages_with_cursor() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![page(&[1, 2], true), page(&[3], false)]),
            MemoryLoader::default(),
        );

        let summary = pipeline.extract("charges").await.unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.stop, StopReason::Exhausted);
        assert_eq!(
            pipeline.extractor.cursors(),
            vec![None, Some("2".to_string())]
        );
        assert_eq!(
            pipeline.loader.records("charges"),
            vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
        );
    }

    #[tokio::test]
    async fn test_stops_after_k_fetches() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![
                page(&[1], true),
                page(&[2], true),
                page(&[3], true),
                page(&[4], false),
                page(&[5], true),
            ]),
            MemoryLoader::default(),
        );

        let summary = pipeline.extract("events").await.unwrap();
        assert_eq!(summary.pages, 4);
        assert_eq!(pipeline.extractor.calls.lock().unwrap().len(), 4);
        assert_eq!(
            pipeline.extractor.cursors(),
            vec![
                None,
                Some("1".to_string()),
                Some("2".to_string()),
                Some("3".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_page_stops_without_writing() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![page(&[], true), page(&[1], false)]),
            MemoryLoader::default(),
        );

        let summary = pipeline.extract("refunds").await.unwrap();
        assert_eq!(summary.stop, StopReason::EmptyPage);
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.records, 0);
        assert!(pipeline.loader.records("refunds").is_empty());
    }

    #[tokio::test]
    async fn test_last_page_is_written() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![page(&[7, 8], false)]),
            MemoryLoader::default(),
        );

        let summary = pipeline.extract("payouts").await.unwrap();
        assert_eq!(summary.stop, StopReason::Exhausted);
        assert_eq!(pipeline.loader.records("payouts").len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_fetch_stops() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![page(&[1], true), None, page(&[2], false)]),
            MemoryLoader::default(),
        );

        let summary = pipeline.extract("disputes").await.unwrap();
        assert_eq!(summary.stop, StopReason::Rejected);
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.records, 1);
    }

    #[tokio::test]
    async fn test_missing_id_stops_after_write() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![
                Some(Page::new(vec![json!({"id": 1}), json!({"name": "no id"})], true)),
                page(&[2], false),
            ]),
            MemoryLoader::default(),
        );

        let summary = pipeline.extract("products").await.unwrap();
        assert_eq!(summary.stop, StopReason::MissingCursor);
        assert_eq!(summary.records, 2);
        assert_eq!(pipeline.extractor.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_continues_after_rejected_method() {
        let pipeline = Pipeline::new(
            ScriptedExtractor::new(vec![None, page(&[1, 2], false)]),
            MemoryLoader::default(),
        );

        let summaries = pipeline.run(["broken", "customers"]).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].stop, StopReason::Rejected);
        assert_eq!(summaries[1].method, "customers");
        assert_eq!(summaries[1].records, 2);
        assert!(pipeline.loader.records("broken").is_empty());

        let methods: Vec<String> = pipeline
            .extractor
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect();
        assert_eq!(methods, vec!["broken", "customers"]);
    }
}

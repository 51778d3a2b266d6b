//! Core extraction abstractions
//!
//! This module provides the page model, the trait seams for fetching and
//! persisting pages, and the [`Pipeline`] that walks a cursor-paginated
//! resource from its first page to its last.

mod extract;
mod load;
mod method;
mod page;
mod pipeline;

pub use extract::Extractor;
pub use load::Loader;
pub use method::method_segments;
pub use page::{Cursor, Page};
pub use pipeline::{Pipeline, StopReason, Summary};

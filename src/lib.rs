//! pagex
//!
//! Extract cursor-paginated API resources into append-only JSON Lines files

pub mod cli;
pub mod client;
pub mod config;
pub mod etl;
pub mod storage;

// Re-exports for convenience
pub use client::{ApiClient, Auth, RequestExecutor, RetryPolicy};
pub use config::Config;
pub use etl::{Cursor, Extractor, Loader, Page, Pipeline, StopReason, Summary};
pub use storage::{NdjsonReader, NdjsonWriter, OutputDirectory};

//! File system storage operations
//!
//! This module handles all file I/O operations including:
//! - Appending pages to JSON Lines files
//! - Reading JSON Lines files back
//! - Per-method output file layout

mod directory;
mod ndjson;

pub use directory::OutputDirectory;
pub use ndjson::{NdjsonReader, NdjsonWriter};

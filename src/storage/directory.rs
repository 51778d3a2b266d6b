//! Per-method output files under a single data folder

use crate::etl::{Loader, method_segments};
use crate::storage::NdjsonWriter;
use eyre::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Output folder holding one `<method>.jsonl` file per extracted method
///
/// Files are only ever appended to. Re-running an extraction against the
/// same folder adds the records again after the existing ones.
#[derive(Clone, Debug)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Open the output folder, creating it if it does not exist
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create output folder: {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the output file for `method`
    ///
    /// Methods containing `/` map to nested files below the folder. Leading,
    /// trailing and doubled slashes are ignored, and `.`/`..` segments are
    /// rejected so the file always lands inside the folder.
    pub fn path_for(&self, method: &str) -> Result<PathBuf> {
        let mut path = self.path.clone();
        let segments = method_segments(method)?;
        if let Some((file, dirs)) = segments.split_last() {
            path.extend(dirs);
            path.push(format!("{}.jsonl", file));
        }
        Ok(path)
    }

    /// Writer for the output file of `method`
    pub fn writer(&self, method: &str) -> Result<NdjsonWriter> {
        let path = self.path_for(method)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(NdjsonWriter::new(path))
    }
}

impl Loader for OutputDirectory {
    async fn load(&self, method: &str, records: &[Value]) -> Result<usize> {
        let writer = self.writer(method)?;
        writer.append(records)?;
        log::trace!(
            "Appended {} record(s) to {}",
            records.len(),
            writer.path().display()
        );
        Ok(records.len())
    }
}

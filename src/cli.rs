//! CLI helper functions

use crate::{
    client::RequestExecutor,
    config::Config,
    etl::{Pipeline, StopReason, Summary},
    storage::OutputDirectory,
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;

/// Extract every method in turn into `<data_folder>/<method>.jsonl`
///
/// Pipeline: RequestExecutor → OutputDirectory, one method at a time
pub async fn extract_methods<S: AsRef<str>>(config: &Config, methods: &[S]) -> Result<Vec<Summary>> {
    log::info!("Extracting from {}", config.url.as_str().bright_black());

    let executor = RequestExecutor::try_new(config).context("Failed to create API client")?;
    let output = OutputDirectory::new(&config.data_folder)?;
    log::info!("Writing to {}", output.path().display().bright_black());

    let pipeline = Pipeline::new(executor, output);
    let summaries = pipeline.run(methods).await?;

    for summary in &summaries {
        log_summary(summary);
    }

    Ok(summaries)
}

fn log_summary(summary: &Summary) {
    match summary.stop {
        StopReason::Exhausted | StopReason::EmptyPage => log::info!(
            "✓ Extracted {} record(s) in {} page(s) for {}",
            summary.records,
            summary.pages,
            summary.method.cyan()
        ),
        StopReason::Rejected | StopReason::MissingCursor => log::warn!(
            "Stopped {} early ({}) after {} record(s) in {} page(s)",
            summary.method.cyan(),
            summary.stop,
            summary.records,
            summary.pages
        ),
    }
}

use std::path::Path;

use log::{error, info, warn};

use super::outcome::{ItemOutcome, RunSummary};

/// Events emitted by the pipeline while a batch runs.
pub enum ProgressEvent<'a> {
    BatchStarted {
        source: &'a Path,
        total: usize,
    },
    ItemStarted {
        index: usize,
        total: usize,
        file_name: &'a str,
    },
    ItemFinished {
        index: usize,
        total: usize,
        file_name: &'a str,
        outcome: &'a ItemOutcome,
    },
    Cancelled {
        remaining: usize,
    },
    BatchFinished {
        source: &'a Path,
        summary: &'a RunSummary,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent<'_>);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent<'_>) {}
}

/// Writes one line per item and a summary per batch through the `log` facade.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent<'_>) {
        match event {
            ProgressEvent::BatchStarted { source, total } => {
                if total == 0 {
                    info!("No image files found in '{}'. Skipping.", source.display());
                } else {
                    info!("Found {} images to process in '{}'.", total, source.display());
                }
            }
            ProgressEvent::ItemStarted {
                index,
                total,
                file_name,
            } => {
                info!("[{}/{}] Processing '{}'...", index, total, file_name);
            }
            ProgressEvent::ItemFinished {
                index,
                total,
                file_name,
                outcome,
            } => log_outcome(index, total, file_name, outcome),
            ProgressEvent::Cancelled { remaining } => {
                warn!(
                    "Cancelled; {} images left untouched in the source directory",
                    remaining
                );
            }
            ProgressEvent::BatchFinished { source, summary } => {
                info!(
                    "Processing for '{}' complete. Successful: {}, Failed: {}.",
                    source.display(),
                    summary.succeeded(),
                    summary.failed()
                );
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn log_outcome(index: usize, total: usize, file_name: &str, outcome: &ItemOutcome) {
    match outcome {
        ItemOutcome::Placed {
            identifier,
            destination,
            renamed: true,
        } => info!(
            "[{}/{}] '{}': SUCCESS, found '{}'. Name already taken, copied as '{}'.",
            index,
            total,
            file_name,
            identifier,
            file_name_of(destination)
        ),
        ItemOutcome::Placed {
            identifier,
            destination,
            renamed: false,
        } => info!(
            "[{}/{}] '{}': SUCCESS, found '{}'. Copied as '{}'.",
            index,
            total,
            file_name,
            identifier,
            file_name_of(destination)
        ),
        ItemOutcome::Unmatched { moved_to } => warn!(
            "[{}/{}] '{}': FAILED, pattern not found. Moved to '{}'.",
            index,
            total,
            file_name,
            moved_to.display()
        ),
        ItemOutcome::Failed {
            error: message,
            moved_to: Some(moved_to),
        } => error!(
            "[{}/{}] '{}': ERROR, {}. Moved to '{}'.",
            index,
            total,
            file_name,
            message,
            moved_to.display()
        ),
        ItemOutcome::Failed {
            error: message,
            moved_to: None,
        } => error!(
            "[{}/{}] '{}': ERROR, {}. File could not be moved to the error directory.",
            index, total, file_name, message
        ),
    }
}

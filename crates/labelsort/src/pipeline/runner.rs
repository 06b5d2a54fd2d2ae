use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, warn};
use tracing::info_span;

use crate::config::LayoutConfig;
use crate::error::{ConfigError, LabelsortError, RecognizeError, WorkerError};
use crate::identifier::{PatternMatcher, PatternNormalizer};
use crate::processor::{join_fragments, TextRecognizer};
use crate::storage::{FileStorage, Placement};
use crate::worker::{DirectoryScanner, ImageItem};

use super::config::{BatchLocations, PipelineConfig};
use super::error::PipelineError;
use super::outcome::{ItemOutcome, ItemReport, OutcomeCounters, RunSummary};
use super::progress::{ProgressEvent, ProgressReporter};

/// Result of the extraction, matching and placement steps for one image.
enum Classification {
    Placed {
        identifier: String,
        placement: Placement,
    },
    Unmatched,
}

/// Sorts the images of one source directory into output and error directories.
///
/// Items are processed strictly one after another. A failure on one item is
/// recorded and the batch continues.
pub struct ClassificationPipeline {
    recognizer: Arc<dyn TextRecognizer>,
    matcher: PatternMatcher,
    normalizer: PatternNormalizer,
    extensions: Vec<String>,
    shutdown: Option<Arc<AtomicBool>>,
}

impl ClassificationPipeline {
    pub fn new(
        config: &PipelineConfig,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            recognizer,
            matcher: PatternMatcher::new(&config.identifier_prefix)?,
            normalizer: PatternNormalizer::new(&config.identifier_prefix, &config.version_marker)?,
            extensions: config.extensions.clone(),
            shutdown: None,
        })
    }

    /// Stops the batch before the next item once `flag` is set.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /// Runs a project folder laid out as `<project>/<input|output|error subdir>`.
    pub fn run_project(
        &self,
        project: &Path,
        layout: &LayoutConfig,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, LabelsortError> {
        if !project.is_dir() {
            return Err(WorkerError::ProjectNotFound(project.to_path_buf()).into());
        }
        self.run(&BatchLocations::for_project(project, layout), progress)
    }

    /// Processes every image in `locations.source`.
    ///
    /// Output and error directories are created first. A missing source
    /// directory is a run with zero items. Only directory creation and
    /// scanning failures are returned as errors.
    pub fn run(
        &self,
        locations: &BatchLocations,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, LabelsortError> {
        let _batch_span = info_span!("batch", source = %locations.source.display()).entered();

        let storage = FileStorage::new(&locations.output, &locations.error);
        storage.prepare()?;

        let scanner = DirectoryScanner::new(&locations.source, &self.extensions)?;
        let items = scanner.scan()?;
        let total = items.len();

        progress.report(ProgressEvent::BatchStarted {
            source: &locations.source,
            total,
        });

        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };
        let mut counters = OutcomeCounters::default();

        for (position, item) in items.iter().enumerate() {
            if self.is_cancelled() {
                summary.remaining = total - position;
                progress.report(ProgressEvent::Cancelled {
                    remaining: summary.remaining,
                });
                break;
            }

            let index = position + 1;
            let file_name = item.file_name();
            progress.report(ProgressEvent::ItemStarted {
                index,
                total,
                file_name: &file_name,
            });

            let outcome = self.process_item(item, &storage);
            counters.record(&outcome);

            progress.report(ProgressEvent::ItemFinished {
                index,
                total,
                file_name: &file_name,
                outcome: &outcome,
            });

            summary.items.push(ItemReport {
                source: item.path().to_path_buf(),
                outcome,
            });
        }

        summary.counters = counters;
        progress.report(ProgressEvent::BatchFinished {
            source: &locations.source,
            summary: &summary,
        });

        Ok(summary)
    }

    /// Takes one image to its final place. Never fails: every problem ends
    /// up as [`ItemOutcome::Failed`] with the image moved to the error
    /// directory when possible.
    pub fn process_item(&self, item: &ImageItem, storage: &FileStorage) -> ItemOutcome {
        let file_name = item.file_name();
        let _item_span = info_span!("item", file = %file_name).entered();

        match self.classify(item, storage) {
            Ok(Classification::Placed {
                identifier,
                placement,
            }) => ItemOutcome::Placed {
                identifier,
                destination: placement.path,
                renamed: placement.renamed,
            },
            Ok(Classification::Unmatched) => match storage.move_to_error(item.path()) {
                Ok(moved_to) => ItemOutcome::Unmatched { moved_to },
                Err(e) => {
                    warn!("Could not move unmatched '{}': {}", file_name, e);
                    ItemOutcome::Failed {
                        error: format!("pattern not found; {}", e),
                        moved_to: None,
                    }
                }
            },
            Err(e) => {
                error!("Processing '{}' failed: {:?}", file_name, e);
                ItemOutcome::Failed {
                    error: e.to_string(),
                    moved_to: self.quarantine(item, storage),
                }
            }
        }
    }

    /// Best-effort move of a failed item. A vanished source is skipped.
    fn quarantine(&self, item: &ImageItem, storage: &FileStorage) -> Option<std::path::PathBuf> {
        if std::fs::symlink_metadata(item.path()).is_err() {
            warn!(
                "'{}' no longer exists; nothing to move to the error directory",
                item.file_name()
            );
            return None;
        }

        match storage.move_to_error(item.path()) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Could not move '{}' to the error directory: {}", item.file_name(), e);
                None
            }
        }
    }

    fn classify(
        &self,
        item: &ImageItem,
        storage: &FileStorage,
    ) -> Result<Classification, PipelineError> {
        let text = {
            let _step = info_span!("extract_text").entered();
            self.extract_text(item)?
        };

        let candidate = {
            let _step = info_span!("match").entered();
            self.matcher.find(&text)
        };

        let Some(candidate) = candidate else {
            debug!("No identifier in {} characters of text", text.len());
            return Ok(Classification::Unmatched);
        };

        let identifier = self.normalizer.normalize(candidate);
        if identifier != candidate {
            debug!("Normalized '{}' -> '{}'", candidate, identifier);
        }

        let placement = {
            let _step = info_span!("place").entered();
            storage.copy_to_output(item.path(), &identifier, &item.extension())?
        };

        Ok(Classification::Placed {
            identifier,
            placement,
        })
    }

    /// A panicking engine fails only the current item.
    fn extract_text(&self, item: &ImageItem) -> Result<String, PipelineError> {
        let fragments = panic::catch_unwind(AssertUnwindSafe(|| {
            self.recognizer.recognize(item.path())
        }))
        .map_err(|payload| RecognizeError::Panicked(panic_message(payload.as_ref())))??;
        Ok(join_fragments(&fragments))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

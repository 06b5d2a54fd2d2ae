pub mod config;
pub mod error;
pub mod outcome;
pub mod progress;
pub mod runner;

pub use config::{BatchLocations, PipelineConfig};
pub use error::PipelineError;
pub use outcome::{ItemOutcome, ItemReport, OutcomeCounters, RunSummary};
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::ClassificationPipeline;

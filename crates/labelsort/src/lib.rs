pub mod config;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod storage;
pub mod worker;

pub use config::{load_config, Config};
pub use error::{ConfigError, LabelsortError, RecognizeError, Result, StorageError, WorkerError};
pub use identifier::{PatternMatcher, PatternNormalizer};
pub use pipeline::{
    BatchLocations, ClassificationPipeline, ItemOutcome, PipelineConfig, ProgressReporter,
    RunSummary,
};
pub use processor::{
    build_recognizer, FixedRecognizer, ScriptedRecognizer, TesseractRecognizer, TextRecognizer,
    TimeoutRecognizer,
};
pub use storage::{DestinationResolver, FileStorage};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelsortError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Recognizer error: {0}")]
    Recognize(#[from] RecognizeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid identifier prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("Invalid extension pattern '{pattern}': {reason}")]
    InvalidExtensionPattern { pattern: String, reason: String },
}

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("Failed to read image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("Failed to initialize OCR engine: {0}")]
    Init(String),

    #[error("OCR timed out after {seconds}s on '{path}'")]
    Timeout { path: PathBuf, seconds: u64 },

    #[error("OCR worker exited without a result")]
    Disconnected,

    #[error("OCR engine panicked: {0}")]
    Panicked(String),

    #[error("Tesseract not available, build with the `tesseract` feature")]
    NotAvailable,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to claim destination '{path}': {source}")]
    ClaimDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy file from '{from}' to '{to}': {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move file from '{from}' to '{to}': {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Project path not found or is not a directory: '{0}'")]
    ProjectNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, LabelsortError>;

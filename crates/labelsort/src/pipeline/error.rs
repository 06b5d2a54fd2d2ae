use thiserror::Error;

/// A failure contained at the item boundary. Never aborts the batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Text extraction failed: {0}")]
    Recognize(#[from] crate::error::RecognizeError),

    #[error("Placement failed: {0}")]
    Storage(#[from] crate::error::StorageError),
}

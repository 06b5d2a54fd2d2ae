use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use log::warn;

use crate::error::RecognizeError;
use crate::processor::TextRecognizer;

/// Bounds each recognition call by a deadline.
///
/// The call runs on a helper thread. When the deadline passes the item fails
/// with [`RecognizeError::Timeout`] and the helper is left to finish on its own;
/// its late result is discarded.
pub struct TimeoutRecognizer {
    inner: Arc<dyn TextRecognizer>,
    timeout: Duration,
}

impl TimeoutRecognizer {
    pub fn new(inner: Arc<dyn TextRecognizer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl TextRecognizer for TimeoutRecognizer {
    fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognizeError> {
        let (tx, rx) = bounded(1);
        let inner = Arc::clone(&self.inner);
        let path = image_path.to_path_buf();
        // The caller's subscriber is thread-scoped; carry it into the helper
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());

        thread::Builder::new()
            .name("labelsort-ocr".into())
            .spawn(move || {
                let result = tracing::dispatcher::with_default(&dispatch, || inner.recognize(&path));
                // Receiver is gone once the deadline has passed
                let _ = tx.send(result);
            })
            .map_err(|e| RecognizeError::Engine(format!("Failed to spawn OCR thread: {}", e)))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "OCR exceeded {}s on {}; abandoning call",
                    self.timeout.as_secs(),
                    image_path.display()
                );
                Err(RecognizeError::Timeout {
                    path: image_path.to_path_buf(),
                    seconds: self.timeout.as_secs(),
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(RecognizeError::Disconnected),
        }
    }
}

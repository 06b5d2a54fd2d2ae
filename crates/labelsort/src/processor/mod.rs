pub mod ocr;
pub mod timeout;

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::RecognizeError;

pub use ocr::TesseractRecognizer;
pub use timeout::TimeoutRecognizer;

/// The OCR capability: turns one image into text fragments in reading order.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognizeError>;
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for Arc<R> {
    fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognizeError> {
        (**self).recognize(image_path)
    }
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for Box<R> {
    fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognizeError> {
        (**self).recognize(image_path)
    }
}

/// Joins recognized fragments with single spaces, preserving their order.
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join(" ")
}

/// Builds the production recognizer: Tesseract, wrapped in a deadline unless
/// `timeout_secs` is zero. Fails when the engine cannot be loaded.
pub fn build_recognizer(config: &OcrConfig) -> Result<Arc<dyn TextRecognizer>, RecognizeError> {
    let engine: Arc<dyn TextRecognizer> = Arc::new(TesseractRecognizer::new(config)?);

    if config.timeout_secs == 0 {
        return Ok(engine);
    }

    Ok(Arc::new(TimeoutRecognizer::new(
        engine,
        Duration::from_secs(config.timeout_secs),
    )))
}

/// Returns the same fragments for every image. Used for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct FixedRecognizer {
    fragments: Vec<String>,
}

impl FixedRecognizer {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

impl TextRecognizer for FixedRecognizer {
    fn recognize(&self, _image_path: &Path) -> Result<Vec<String>, RecognizeError> {
        Ok(self.fragments.clone())
    }
}

/// Answers per image file name; unknown images yield no text.
/// Used for tests and dry runs where the OCR output is known up front.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecognizer {
    answers: HashMap<OsString, Result<Vec<String>, String>>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `file_name` reads as `fragments`.
    pub fn text<S: Into<String>>(
        mut self,
        file_name: impl AsRef<OsStr>,
        fragments: impl IntoIterator<Item = S>,
    ) -> Self {
        self.answers.insert(
            file_name.as_ref().to_os_string(),
            Ok(fragments.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Recognition of `file_name` fails with an engine error.
    pub fn fail(mut self, file_name: impl AsRef<OsStr>, message: impl Into<String>) -> Self {
        self.answers
            .insert(file_name.as_ref().to_os_string(), Err(message.into()));
        self
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognizeError> {
        let answer = image_path
            .file_name()
            .and_then(|name| self.answers.get(name));

        match answer {
            Some(Ok(fragments)) => Ok(fragments.clone()),
            Some(Err(message)) => Err(RecognizeError::Engine(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

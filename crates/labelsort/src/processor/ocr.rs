use std::path::Path;
use std::sync::Arc;

use crate::config::OcrConfig;
use crate::error::RecognizeError;
use crate::processor::TextRecognizer;

/// Tesseract-backed recognizer.
///
/// A fresh engine is created per image; construction only verifies that the
/// engine can be loaded for the configured languages.
#[derive(Clone)]
pub struct TesseractRecognizer {
    inner: Arc<TesseractInner>,
}

#[cfg_attr(not(feature = "tesseract"), allow(dead_code))]
struct TesseractInner {
    languages: String,
    data_path: Option<String>,
}

impl TesseractRecognizer {
    pub fn new(config: &OcrConfig) -> Result<Self, RecognizeError> {
        let inner = TesseractInner {
            languages: config.language_string(),
            data_path: config.data_path.clone(),
        };

        backend::probe(&inner)?;

        Ok(Self {
            inner: Arc::new(inner),
        })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image_path: &Path) -> Result<Vec<String>, RecognizeError> {
        let _span = tracing::info_span!("processor.ocr").entered();

        let image_data = std::fs::read(image_path).map_err(|e| RecognizeError::ReadImage {
            path: image_path.to_path_buf(),
            source: e,
        })?;

        let text = backend::recognize_bytes(&self.inner, &image_data)?;
        Ok(split_fragments(&text))
    }
}

/// Splits engine output into trimmed, non-empty lines.
fn split_fragments(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(feature = "tesseract")]
mod backend {
    use std::io::Cursor;

    use super::TesseractInner;
    use crate::error::RecognizeError;

    fn engine(inner: &TesseractInner) -> Result<leptess::LepTess, RecognizeError> {
        leptess::LepTess::new(inner.data_path.as_deref(), &inner.languages)
            .map_err(|e| RecognizeError::Init(e.to_string()))
    }

    pub(super) fn probe(inner: &TesseractInner) -> Result<(), RecognizeError> {
        engine(inner).map(|_| ())
    }

    pub(super) fn recognize_bytes(
        inner: &TesseractInner,
        image_data: &[u8],
    ) -> Result<String, RecognizeError> {
        let img = image::load_from_memory(image_data)
            .map_err(|e| RecognizeError::ImageDecode(e.to_string()))?;

        // leptess reads PNG reliably regardless of the source encoding
        let mut png_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| RecognizeError::ImageDecode(format!("Failed to convert image: {}", e)))?;

        let mut lt = engine(inner)?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| RecognizeError::Engine(format!("Failed to set image: {}", e)))?;

        lt.get_utf8_text()
            .map_err(|e| RecognizeError::Engine(e.to_string()))
    }
}

#[cfg(not(feature = "tesseract"))]
mod backend {
    use super::TesseractInner;
    use crate::error::RecognizeError;

    pub(super) fn probe(_inner: &TesseractInner) -> Result<(), RecognizeError> {
        Err(RecognizeError::NotAvailable)
    }

    pub(super) fn recognize_bytes(
        _inner: &TesseractInner,
        _image_data: &[u8],
    ) -> Result<String, RecognizeError> {
        Err(RecognizeError::NotAvailable)
    }
}

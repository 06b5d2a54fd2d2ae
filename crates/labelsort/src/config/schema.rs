use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub identifier: IdentifierConfig,
    /// Glob patterns matched against file names in the source directory.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identifier: IdentifierConfig::default(),
            extensions: default_extensions(),
            layout: LayoutConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

/// Shape of the identifier code printed on the scanned labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// Literal prefix every identifier starts with.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Marker directly after the prefix that introduces the version segment.
    #[serde(default = "default_version_marker")]
    pub version_marker: String,
}

fn default_prefix() -> String {
    "MT_PM_".to_string()
}

fn default_version_marker() -> String {
    "V".to_string()
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            version_marker: default_version_marker(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![
        "*.jpg".to_string(),
        "*.jpeg".to_string(),
        "*.png".to_string(),
    ]
}

/// Subfolder names used when a project folder is given instead of explicit paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_input_subdir")]
    pub input_subdir: String,
    #[serde(default = "default_output_subdir")]
    pub output_subdir: String,
    #[serde(default = "default_error_subdir")]
    pub error_subdir: String,
}

fn default_input_subdir() -> String {
    "input_images".to_string()
}

fn default_output_subdir() -> String {
    "output_images".to_string()
}

fn default_error_subdir() -> String {
    "error_images".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            input_subdir: default_input_subdir(),
            output_subdir: default_output_subdir(),
            error_subdir: default_error_subdir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Tessdata directory; `None` lets Tesseract use its built-in search path.
    #[serde(default)]
    pub data_path: Option<String>,
    /// Per-image recognition deadline. Zero disables the deadline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            data_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OcrConfig {
    /// Language string in the `eng+deu` form Tesseract expects.
    pub fn language_string(&self) -> String {
        if self.languages.is_empty() {
            "eng".to_string()
        } else {
            self.languages.join("+")
        }
    }
}

use std::path::{Path, PathBuf};

use crate::config::{Config, LayoutConfig};

pub struct PipelineConfig {
    pub identifier_prefix: String,
    pub version_marker: String,
    pub extensions: Vec<String>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            identifier_prefix: config.identifier.prefix.clone(),
            version_marker: config.identifier.version_marker.clone(),
            extensions: config.extensions.clone(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The three directories one batch works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLocations {
    pub source: PathBuf,
    pub output: PathBuf,
    pub error: PathBuf,
}

impl BatchLocations {
    pub fn new<A, B, C>(source: A, output: B, error: C) -> Self
    where
        A: Into<PathBuf>,
        B: Into<PathBuf>,
        C: Into<PathBuf>,
    {
        Self {
            source: source.into(),
            output: output.into(),
            error: error.into(),
        }
    }

    /// Locations for a project folder using the configured subfolder names.
    pub fn for_project(project: &Path, layout: &LayoutConfig) -> Self {
        Self {
            source: project.join(&layout.input_subdir),
            output: project.join(&layout.output_subdir),
            error: project.join(&layout.error_subdir),
        }
    }
}

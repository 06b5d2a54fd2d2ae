//! Test harness for isolated batch runs.
//!
//! `TestHarness` owns a temporary folder laid out like a project
//! (`input_images`, `output_images`, `error_images`) and runs the
//! classification pipeline against it with a scripted recognizer.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use labelsort::config::LayoutConfig;
use labelsort::pipeline::{
    BatchLocations, ClassificationPipeline, NoopProgress, PipelineConfig, RunSummary,
};
pub use labelsort::processor::ScriptedRecognizer;
use labelsort::processor::TextRecognizer;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Project folder inside the temp dir.
    pub project: PathBuf,
    pub locations: BatchLocations,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project = temp_dir.path().join("project");
        let locations = BatchLocations::for_project(&project, &LayoutConfig::default());

        std::fs::create_dir_all(&locations.source).expect("Failed to create input dir");

        Self {
            temp_dir,
            project,
            locations,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes an image into the input folder. The content is the file name,
    /// so copies can be traced back to their source.
    pub fn write_image(&self, file_name: &str) -> PathBuf {
        let path = self.locations.source.join(file_name);
        std::fs::write(&path, file_name.as_bytes()).expect("Failed to write input image");
        path
    }

    /// Pre-populates the output folder.
    pub fn write_output(&self, file_name: &str, content: &[u8]) -> PathBuf {
        std::fs::create_dir_all(&self.locations.output).expect("Failed to create output dir");
        let path = self.locations.output.join(file_name);
        std::fs::write(&path, content).expect("Failed to write output file");
        path
    }

    pub fn pipeline(&self, recognizer: impl TextRecognizer + 'static) -> ClassificationPipeline {
        self.pipeline_with_config(&PipelineConfig::default(), recognizer)
    }

    pub fn pipeline_with_config(
        &self,
        config: &PipelineConfig,
        recognizer: impl TextRecognizer + 'static,
    ) -> ClassificationPipeline {
        ClassificationPipeline::new(config, Arc::new(recognizer)).expect("Invalid pipeline config")
    }

    pub fn run(&self, recognizer: impl TextRecognizer + 'static) -> RunSummary {
        self.pipeline(recognizer)
            .run(&self.locations, &NoopProgress)
            .expect("Batch run failed")
    }

    pub fn input_files(&self) -> Vec<String> {
        list_files(&self.locations.source)
    }

    pub fn output_files(&self) -> Vec<String> {
        list_files(&self.locations.output)
    }

    pub fn error_files(&self) -> Vec<String> {
        list_files(&self.locations.error)
    }

    pub fn read_output(&self, file_name: &str) -> Vec<u8> {
        std::fs::read(self.locations.output.join(file_name)).expect("Failed to read output file")
    }
}

/// Sorted file names directly inside `dir`; empty when it does not exist.
pub fn list_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

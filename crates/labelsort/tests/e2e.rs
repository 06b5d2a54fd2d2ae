//! End-to-end tests for batch runs over a project folder.
//!
//! Each case lists the images dropped into `input_images` together with what
//! the recognizer "reads" on them, and the files expected afterwards in the
//! output and error folders.

mod common;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use common::{ScriptedRecognizer, TestHarness};
use labelsort::config::LayoutConfig;
use labelsort::pipeline::{
    ItemOutcome, NoopProgress, PipelineConfig, ProgressEvent, ProgressReporter,
};

/// One image and the text recognized on it. `None` simulates an engine error.
struct Image {
    name: &'static str,
    text: Option<&'static [&'static str]>,
}

struct TestCase {
    name: &'static str,
    images: &'static [Image],
    expected_output: &'static [&'static str],
    expected_error: &'static [&'static str],
    expected_succeeded: usize,
    expected_failed: usize,
}

const TEST_CASES: &[TestCase] = &[
    TestCase {
        name: "single_match",
        images: &[Image {
            name: "scan_001.jpg",
            text: Some(&["Lot 7", "MT_PM_V2_PUMP_A", "QC passed"]),
        }],
        expected_output: &["MT_PM_V2_PUMP_A.jpg"],
        expected_error: &[],
        expected_succeeded: 1,
        expected_failed: 0,
    },
    TestCase {
        name: "version_is_normalized",
        images: &[Image {
            name: "scan.png",
            text: Some(&["MT_PM_VIO_TEST"]),
        }],
        expected_output: &["MT_PM_V10_TEST.png"],
        expected_error: &[],
        expected_succeeded: 1,
        expected_failed: 0,
    },
    TestCase {
        name: "no_identifier",
        images: &[Image {
            name: "blank.jpeg",
            text: Some(&["nothing", "useful"]),
        }],
        expected_output: &[],
        expected_error: &["blank.jpeg"],
        expected_succeeded: 0,
        expected_failed: 1,
    },
    TestCase {
        name: "no_text_at_all",
        images: &[Image {
            name: "dark.png",
            text: Some(&[]),
        }],
        expected_output: &[],
        expected_error: &["dark.png"],
        expected_succeeded: 0,
        expected_failed: 1,
    },
    TestCase {
        name: "engine_error",
        images: &[Image {
            name: "corrupt.jpg",
            text: None,
        }],
        expected_output: &[],
        expected_error: &["corrupt.jpg"],
        expected_succeeded: 0,
        expected_failed: 1,
    },
    TestCase {
        name: "duplicate_identifiers",
        images: &[
            Image {
                name: "a.jpg",
                text: Some(&["MT_PM_V1_DUP"]),
            },
            Image {
                name: "b.jpg",
                text: Some(&["MT_PM_V1_DUP"]),
            },
            Image {
                name: "c.jpg",
                text: Some(&["MT_PM_VI_DUP"]),
            },
        ],
        expected_output: &["MT_PM_V1_DUP.jpg", "MT_PM_V1_DUP_1.jpg", "MT_PM_V1_DUP_2.jpg"],
        expected_error: &[],
        expected_succeeded: 3,
        expected_failed: 0,
    },
    TestCase {
        name: "mixed_batch",
        images: &[
            Image {
                name: "good.png",
                text: Some(&["MT_PM_V3_OK"]),
            },
            Image {
                name: "empty.png",
                text: Some(&["label"]),
            },
            Image {
                name: "broken.jpg",
                text: None,
            },
        ],
        expected_output: &["MT_PM_V3_OK.png"],
        expected_error: &["broken.jpg", "empty.png"],
        expected_succeeded: 1,
        expected_failed: 2,
    },
];

fn run_test_case(test_case: &TestCase) {
    let harness = TestHarness::new();
    let mut recognizer = ScriptedRecognizer::new();

    for image in test_case.images {
        harness.write_image(image.name);
        recognizer = match image.text {
            Some(fragments) => recognizer.text(image.name, fragments.iter().copied()),
            None => recognizer.fail(image.name, "engine crashed"),
        };
    }

    let summary = harness.run(recognizer);

    assert_eq!(
        summary.succeeded(),
        test_case.expected_succeeded,
        "[{}] succeeded count",
        test_case.name
    );
    assert_eq!(
        summary.failed(),
        test_case.expected_failed,
        "[{}] failed count",
        test_case.name
    );
    assert_eq!(
        summary.total,
        test_case.images.len(),
        "[{}] total",
        test_case.name
    );
    assert_eq!(
        harness.output_files(),
        test_case.expected_output,
        "[{}] output folder",
        test_case.name
    );
    assert_eq!(
        harness.error_files(),
        test_case.expected_error,
        "[{}] error folder",
        test_case.name
    );

    // Placed images are copies; failed ones were moved away
    let mut expected_input: Vec<&str> = test_case
        .images
        .iter()
        .map(|i| i.name)
        .filter(|name| !test_case.expected_error.contains(name))
        .collect();
    expected_input.sort();
    assert_eq!(
        harness.input_files(),
        expected_input,
        "[{}] input folder",
        test_case.name
    );
}

#[test]
fn test_all_cases() {
    for test_case in TEST_CASES {
        run_test_case(test_case);
    }
}

#[test]
fn test_copy_preserves_content() {
    let harness = TestHarness::new();
    harness.write_image("label.jpg");

    harness.run(ScriptedRecognizer::new().text("label.jpg", ["MT_PM_V1_CONTENT"]));

    assert_eq!(harness.read_output("MT_PM_V1_CONTENT.jpg"), b"label.jpg");
}

#[test]
fn test_existing_output_is_never_overwritten() {
    let harness = TestHarness::new();
    harness.write_output("MT_PM_V1_KEEP.jpg", b"previous run");
    harness.write_image("new.jpg");

    let summary = harness.run(ScriptedRecognizer::new().text("new.jpg", ["MT_PM_V1_KEEP"]));

    assert_eq!(harness.read_output("MT_PM_V1_KEEP.jpg"), b"previous run");
    assert_eq!(harness.read_output("MT_PM_V1_KEEP_1.jpg"), b"new.jpg");
    assert!(matches!(
        summary.items[0].outcome,
        ItemOutcome::Placed { renamed: true, .. }
    ));
}

#[test]
fn test_error_folder_name_clash_gets_suffix() {
    let harness = TestHarness::new();
    std::fs::create_dir_all(&harness.locations.error).unwrap();
    std::fs::write(harness.locations.error.join("blank.jpg"), b"older").unwrap();
    harness.write_image("blank.jpg");

    let summary = harness.run(ScriptedRecognizer::new());

    assert_eq!(summary.failed(), 1);
    assert_eq!(harness.error_files(), vec!["blank.jpg", "blank_1.jpg"]);
    assert_eq!(
        std::fs::read(harness.locations.error.join("blank.jpg")).unwrap(),
        b"older"
    );
}

#[test]
fn test_non_image_files_are_ignored() {
    let harness = TestHarness::new();
    harness.write_image("notes.txt");
    harness.write_image("label.JPG");
    harness.write_image("label.png");
    std::fs::create_dir_all(harness.locations.source.join("nested.png")).unwrap();

    let summary = harness.run(ScriptedRecognizer::new().text("label.png", ["MT_PM_V1_PNG"]));

    assert_eq!(summary.total, 1);
    assert_eq!(harness.output_files(), vec!["MT_PM_V1_PNG.png"]);
    assert_eq!(harness.input_files(), vec!["label.JPG", "label.png", "notes.txt"]);
}

#[cfg(unix)]
#[test]
fn test_symlinked_images_are_processed() {
    let harness = TestHarness::new();
    let stored = harness.temp_path().join("archive.jpg");
    std::fs::write(&stored, b"archived scan").unwrap();
    std::os::unix::fs::symlink(&stored, harness.locations.source.join("linked.jpg")).unwrap();
    std::os::unix::fs::symlink(
        harness.temp_path().join("gone.jpg"),
        harness.locations.source.join("dangling.jpg"),
    )
    .unwrap();

    let summary = harness.run(ScriptedRecognizer::new().text("linked.jpg", ["MT_PM_V4_LINK"]));

    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(harness.read_output("MT_PM_V4_LINK.jpg"), b"archived scan");
    assert!(stored.exists());
}

#[test]
fn test_custom_extensions_and_prefix() {
    let harness = TestHarness::new();
    harness.write_image("scan.tif");
    harness.write_image("scan.jpg");
    let config = PipelineConfig {
        identifier_prefix: "QA_".to_string(),
        version_marker: "R".to_string(),
        extensions: vec!["*.tif".to_string()],
    };
    let pipeline = harness.pipeline_with_config(
        &config,
        ScriptedRecognizer::new().text("scan.tif", ["see QA_RIO_BOARD"]),
    );

    let summary = pipeline.run(&harness.locations, &NoopProgress).unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(harness.output_files(), vec!["QA_R10_BOARD.tif"]);
}

#[test]
fn test_project_mode_creates_folders() {
    let harness = TestHarness::new();
    harness.write_image("one.png");
    let pipeline = harness.pipeline(ScriptedRecognizer::new().text("one.png", ["MT_PM_V1_P"]));

    let summary = pipeline
        .run_project(&harness.project, &LayoutConfig::default(), &NoopProgress)
        .unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert!(harness.project.join("output_images/MT_PM_V1_P.png").is_file());
    assert!(harness.project.join("error_images").is_dir());
}

#[test]
fn test_project_without_input_folder_is_empty_run() {
    let harness = TestHarness::new();
    let project = harness.temp_path().join("fresh");
    std::fs::create_dir_all(&project).unwrap();
    let pipeline = harness.pipeline(ScriptedRecognizer::new());

    let summary = pipeline
        .run_project(&project, &LayoutConfig::default(), &NoopProgress)
        .unwrap();

    assert_eq!(summary.total, 0);
    assert!(project.join("output_images").is_dir());
    assert!(project.join("error_images").is_dir());
}

#[test]
fn test_project_path_that_is_a_file_is_rejected() {
    let harness = TestHarness::new();
    let file = harness.temp_path().join("not_a_project.txt");
    std::fs::write(&file, b"x").unwrap();
    let pipeline = harness.pipeline(ScriptedRecognizer::new());

    let result = pipeline.run_project(&file, &LayoutConfig::default(), &NoopProgress);

    assert!(result.is_err());
    assert!(!harness.temp_path().join("not_a_project.txt/output_images").exists());
}

#[test]
fn test_cancelled_run_leaves_images_untouched() {
    let harness = TestHarness::new();
    harness.write_image("a.jpg");
    harness.write_image("b.jpg");
    let shutdown = Arc::new(AtomicBool::new(true));
    let pipeline = harness
        .pipeline(ScriptedRecognizer::new().text("a.jpg", ["MT_PM_V1_A"]))
        .with_shutdown(shutdown);

    let summary = pipeline.run(&harness.locations, &NoopProgress).unwrap();

    assert!(summary.was_cancelled());
    assert_eq!(summary.remaining, 2);
    assert!(summary.items.is_empty());
    assert_eq!(harness.input_files(), vec!["a.jpg", "b.jpg"]);
    assert!(harness.output_files().is_empty());
}

/// Records progress events as short strings.
#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent<'_>) {
        let line = match event {
            ProgressEvent::BatchStarted { total, .. } => format!("start {}", total),
            ProgressEvent::ItemStarted { index, total, .. } => format!("item {}/{}", index, total),
            ProgressEvent::ItemFinished {
                file_name, outcome, ..
            } => format!("done {} {}", file_name, outcome.is_success()),
            ProgressEvent::Cancelled { remaining } => format!("cancelled {}", remaining),
            ProgressEvent::BatchFinished { summary, .. } => {
                format!("finish {}/{}", summary.succeeded(), summary.failed())
            }
        };
        self.events.lock().unwrap().push(line);
    }
}

#[test]
fn test_progress_events_per_item() {
    let harness = TestHarness::new();
    harness.write_image("only.png");
    let pipeline = harness.pipeline(ScriptedRecognizer::new().text("only.png", ["MT_PM_V1_ONLY"]));
    let progress = RecordingProgress::default();

    pipeline.run(&harness.locations, &progress).unwrap();

    assert_eq!(
        *progress.events.lock().unwrap(),
        vec!["start 1", "item 1/1", "done only.png true", "finish 1/0"]
    );
}

#[test]
fn test_progress_reports_cancellation() {
    let harness = TestHarness::new();
    harness.write_image("left.png");
    let pipeline = harness
        .pipeline(ScriptedRecognizer::new())
        .with_shutdown(Arc::new(AtomicBool::new(true)));
    let progress = RecordingProgress::default();

    pipeline.run(&harness.locations, &progress).unwrap();

    assert_eq!(
        *progress.events.lock().unwrap(),
        vec!["start 1", "cancelled 1", "finish 0/0"]
    );
}

#[test]
fn test_rerun_copies_again_with_suffix() {
    let harness = TestHarness::new();
    harness.write_image("same.png");
    let recognizer = ScriptedRecognizer::new().text("same.png", ["MT_PM_V1_AGAIN"]);

    harness.run(recognizer.clone());
    let second = harness.run(recognizer);

    assert_eq!(second.succeeded(), 1);
    assert_eq!(
        harness.output_files(),
        vec!["MT_PM_V1_AGAIN.png", "MT_PM_V1_AGAIN_1.png"]
    );
}

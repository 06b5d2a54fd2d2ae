use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};

use labelsort::config::{load_config, validate_config, Config};
use labelsort::error::{LabelsortError, WorkerError};
use labelsort::logging::LoggingContext;
use labelsort::pipeline::{
    BatchLocations, ClassificationPipeline, LogProgress, OutcomeCounters, PipelineConfig,
};
use labelsort::processor::build_recognizer;

#[derive(Parser)]
#[command(
    version,
    about = "Renames scanned label images by the identifier code printed on them"
)]
struct Opts {
    /// Increase verbosity (-v, -vv). Default INFO.
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Decrease verbosity (-q, -qq).
    #[arg(short = 'q', action = clap::ArgAction::Count, global = true)]
    quiet: u8,
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    ocr: OcrOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct OcrOpts {
    /// OCR language, repeatable (e.g. --lang eng --lang deu).
    #[arg(long = "lang", global = true)]
    languages: Vec<String>,
    /// Tessdata directory.
    #[arg(long, global = true)]
    tessdata: Option<String>,
    /// Seconds allowed per image before OCR is abandoned; 0 disables.
    #[arg(long, global = true)]
    ocr_timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Process project folders, each containing an input subfolder
    Projects {
        #[arg(required = true, value_name = "PROJECT_PATH")]
        paths: Vec<String>,
    },
    /// Process one source folder into explicit output and error folders
    Run {
        source: PathBuf,
        output: PathBuf,
        error: PathBuf,
    },
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    let verbosity = (i16::from(opts.verbose) - i16::from(opts.quiet)).clamp(-8, 8) as i8;
    let logging = LoggingContext::init(verbosity);

    let code = match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    };

    drop(logging);
    code
}

fn load_effective_config(opts: &Opts) -> Result<Config, LabelsortError> {
    let mut config = match &opts.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if !opts.ocr.languages.is_empty() {
        config.ocr.languages = opts.ocr.languages.clone();
    }
    if let Some(tessdata) = &opts.ocr.tessdata {
        config.ocr.data_path = Some(tessdata.clone());
    }
    if let Some(timeout) = opts.ocr.ocr_timeout {
        config.ocr.timeout_secs = timeout;
    }

    validate_config(&config)?;
    Ok(config)
}

fn run(opts: Opts) -> Result<(), LabelsortError> {
    let config = load_effective_config(&opts)?;

    info!(
        "Loading OCR engine ({}), this may take a moment...",
        config.ocr.language_string()
    );
    let recognizer = build_recognizer(&config.ocr)?;
    info!("OCR engine loaded.");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || {
            flag.store(true, Ordering::Relaxed);
        }) {
            warn!("Ctrl-C handler not installed: {}", e);
        }
    }

    let pipeline = ClassificationPipeline::new(&PipelineConfig::from_config(&config), recognizer)?
        .with_shutdown(Arc::clone(&shutdown));
    let progress = LogProgress;
    let mut totals = OutcomeCounters::default();

    match opts.command {
        Command::Projects { paths } => {
            for raw in paths {
                if shutdown.load(Ordering::Relaxed) {
                    warn!("Cancelled; skipping remaining projects");
                    break;
                }

                let project = PathBuf::from(raw.trim());
                info!("==================== Processing Project: {} ====================", project.display());

                match pipeline.run_project(&project, &config.layout, &progress) {
                    Ok(summary) => totals += summary.counters,
                    Err(LabelsortError::Worker(WorkerError::ProjectNotFound(path))) => {
                        error!(
                            "Project path not found or is not a directory: '{}'",
                            path.display()
                        );
                    }
                    Err(e) => error!("Project '{}' aborted: {}", project.display(), e),
                }
            }
        }
        Command::Run {
            source,
            output,
            error,
        } => {
            let summary = pipeline.run(&BatchLocations::new(source, output, error), &progress)?;
            totals += summary.counters;
        }
    }

    info!(
        "All done. Successful: {}, Failed: {}.",
        totals.succeeded, totals.failed
    );
    Ok(())
}

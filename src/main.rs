use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::channel;
use std::thread;
use tracing::{debug, error, info, warn};

use dataset_inspector::core::{AnalysisReport, InspectProgress};
use dataset_inspector::logging::setup_logging;
use dataset_inspector::{inspect_dataset_with_progress, AppConfig};

/// Exit code for a dataset directory that does not exist
const EXIT_NOT_FOUND: u8 = 2;

/// Check an image classification dataset for format errors and count its classes
#[derive(Parser, Debug)]
#[command(name = "dataset-inspector")]
#[command(version)]
#[command(about = "Check an image classification dataset for format errors and class balance")]
struct Cli {
    /// The directory containing the images to analyze
    image_dir: PathBuf,

    /// JSON config file (defaults to config.json in the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (config, outcome) = AppConfig::read(cli.config.as_deref());
    setup_logging(&config).context("Failed to set up logging")?;
    outcome.log();
    debug!("Using config: {:?}", config);

    if !cli.image_dir.exists() {
        return Ok(not_found(&cli.image_dir));
    }

    let (tx, rx) = channel::<InspectProgress>();
    let root = cli.image_dir.clone();
    let worker_config = config.clone();

    let worker = thread::spawn(move || {
        inspect_dataset_with_progress(&root, &worker_config, Some(tx), None)
    });

    // Ends once the worker drops its sender
    for message in rx {
        match message {
            InspectProgress::Progress { visited, invalid } => {
                info!("Checked {} files so far ({} invalid)", visited, invalid);
            }
            InspectProgress::Complete { total, invalid } => {
                info!("Checked all {} files ({} invalid)", total, invalid);
            }
            InspectProgress::Cancelled { visited } => {
                warn!("Inspection cancelled after {} files", visited);
            }
        }
    }

    let result = worker
        .join()
        .map_err(|_| anyhow!("Inspection thread panicked"))?;

    match result {
        Ok(report) => {
            print_report(&report, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_not_found() => Ok(not_found(&cli.image_dir)),
        Err(e) => {
            error!("Inspection failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_report(report: &AnalysisReport, pretty: bool) -> anyhow::Result<()> {
    if report.discarded_labels > 0 {
        warn!(
            "{} label rows were discarded from the {} label source",
            report.discarded_labels,
            report.label_source.as_str()
        );
    }

    let response = report.to_response();
    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);
    Ok(())
}

fn not_found(path: &std::path::Path) -> ExitCode {
    error!("Directory not found: {:?}", path);
    println!("{}", serde_json::json!({ "detail": "Directory not found" }));
    ExitCode::from(EXIT_NOT_FOUND)
}

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::config::AppConfig;

/// Install the global subscriber.
///
/// Logs always go to stderr. When `log_to_file` is set a timestamped log file
/// is created as well, and its path is returned. `RUST_LOG` overrides the
/// default `info` filter.
pub fn setup_logging(config: &AppConfig) -> io::Result<Option<PathBuf>> {
    let log_file = if config.log_to_file {
        let log_dir = match &config.log_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?.join("logs"),
        };
        fs::create_dir_all(&log_dir)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("dataset_inspector_{}.log", timestamp));

        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_path)?;
        Some((log_path, file))
    } else {
        None
    };

    let (log_path, file_layer) = match log_file {
        Some((path, file)) => {
            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            (Some(path), Some(layer))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}

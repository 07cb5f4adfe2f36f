use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};
use tracing::{debug, info, warn};

use super::image_check::verify_image;
use crate::config::AppConfig;
use crate::core::error::{InspectError, InspectResult};
use crate::core::labels::{ensure_root, is_label_file_name};
use crate::core::walk::walk_files;

/// Progress message types for a running inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectProgress {
    Progress { visited: usize, invalid: usize },
    Complete { total: usize, invalid: usize },
    Cancelled { visited: usize },
}

/// Outcome of checking one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageStatus {
    /// Accepted extension and decodes
    Valid,
    /// Extension outside the accepted set
    WrongExtension,
    /// Accepted extension but fails to decode
    Unreadable,
}

impl ImageStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ImageStatus::Valid)
    }
}

/// One visited file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// Lowercased extension, if the file has one
    pub extension: Option<String>,
    pub status: ImageStatus,
}

impl ImageEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of walking and checking the whole tree
#[derive(Debug, Clone)]
pub struct ValidationSummary {
    /// Every visited file in visiting order
    pub entries: Vec<ImageEntry>,
    pub total: usize,
    pub invalid: usize,
    /// File names of wrong-extension and unreadable files
    pub invalid_files: Vec<String>,
    pub message: String,
}

impl ValidationSummary {
    pub fn from_entries(entries: Vec<ImageEntry>) -> Self {
        let invalid_files: Vec<String> = entries
            .iter()
            .filter(|entry| !entry.status.is_valid())
            .map(ImageEntry::file_name)
            .collect();
        let total = entries.len();
        let invalid = invalid_files.len();

        Self {
            entries,
            total,
            invalid,
            invalid_files,
            message: format_message(total, invalid),
        }
    }

    pub fn valid(&self) -> usize {
        self.total - self.invalid
    }

    /// Number of entries with the given status
    pub fn count(&self, status: ImageStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// Human readable format verdict for `total` files of which `invalid` failed
pub fn format_message(total: usize, invalid: usize) -> String {
    if invalid == 0 {
        format!("All {} images are in the correct format.", total)
    } else {
        format!("{} out of {} images are in incorrect format.", invalid, total)
    }
}

/// Classify a single file
pub fn check_file(path: &Path, config: &AppConfig) -> ImageEntry {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    let status = match &extension {
        Some(ext) if config.is_accepted_extension(ext) => match verify_image(path, config.verify) {
            Ok(()) => ImageStatus::Valid,
            Err(e) => {
                debug!("Error reading {:?}: {}", path, e);
                ImageStatus::Unreadable
            }
        },
        _ => {
            debug!("{:?}: format error, extension not accepted", path);
            ImageStatus::WrongExtension
        }
    };

    ImageEntry {
        path: path.to_path_buf(),
        extension,
        status,
    }
}

/// Walk the tree under `root` and check every file, with optional progress
/// reporting and cancellation.
///
/// Label files directly inside `root` are dataset metadata and are skipped.
/// Undecodable images never abort the walk; only filesystem errors, the
/// file limit and cancellation do.
pub fn validate_tree_with_progress(
    root: &Path,
    config: &AppConfig,
    progress_tx: Option<&Sender<InspectProgress>>,
    cancel_flag: Option<&AtomicBool>,
) -> InspectResult<ValidationSummary> {
    ensure_root(root)?;
    info!("Validating images under {:?}", root);

    let mut entries = Vec::new();
    let mut invalid = 0;

    for entry in walk_files(root) {
        let entry = entry?;

        if entry.depth() == 1 && entry.file_name().to_str().is_some_and(is_label_file_name) {
            continue;
        }

        if let Some(cancel) = cancel_flag {
            if cancel.load(Ordering::Relaxed) {
                warn!("Validation cancelled after {} files", entries.len());
                if let Some(tx) = progress_tx {
                    let _ = tx.send(InspectProgress::Cancelled {
                        visited: entries.len(),
                    });
                }
                return Err(InspectError::Cancelled {
                    visited: entries.len(),
                });
            }
        }

        if let Some(limit) = config.max_files {
            if entries.len() >= limit {
                warn!("Dataset exceeds the limit of {} files", limit);
                return Err(InspectError::FileLimitExceeded { limit });
            }
        }

        let checked = check_file(entry.path(), config);
        if !checked.status.is_valid() {
            invalid += 1;
        }
        entries.push(checked);

        if let Some(tx) = progress_tx {
            let visited = entries.len();
            if config.progress_interval > 0 && visited % config.progress_interval == 0 {
                let _ = tx.send(InspectProgress::Progress { visited, invalid });
            }
        }
    }

    let summary = ValidationSummary::from_entries(entries);
    info!(
        "Validation complete: {} files, {} invalid",
        summary.total, summary.invalid
    );
    Ok(summary)
}

/// Walk and check the tree (synchronous version)
pub fn validate_tree(root: &Path, config: &AppConfig) -> InspectResult<ValidationSummary> {
    validate_tree_with_progress(root, config, None, None)
}

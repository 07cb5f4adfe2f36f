use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for dataset inspection
pub type InspectResult<T> = Result<T, InspectError>;

/// Error types that abort an inspection run.
///
/// Per-file decode failures are never reported here; they end up in the
/// invalid file list of the report instead.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Root path does not exist or is not a directory
    #[error("Directory not found: {0:?}")]
    NotFound(PathBuf),

    /// A CSV or JSON label file is present but could not be read or parsed
    #[error("Malformed label source {path:?}: {reason}")]
    MalformedLabelSource { path: PathBuf, reason: String },

    /// Filesystem error while listing or walking the dataset
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The walk visited more files than the configured bound allows
    #[error("Dataset exceeds the limit of {limit} files")]
    FileLimitExceeded { limit: usize },

    /// The caller raised the cancellation flag
    #[error("Inspection cancelled after {visited} files")]
    Cancelled { visited: usize },
}

impl InspectError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        InspectError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: &Path, reason: impl ToString) -> Self {
        InspectError::MalformedLabelSource {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure is the caller's fault (bad root path) rather than
    /// a problem encountered while inspecting.
    pub fn is_not_found(&self) -> bool {
        matches!(self, InspectError::NotFound(_))
    }
}

impl From<walkdir::Error> for InspectError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(Path::to_path_buf).unwrap_or_default();
        InspectError::Io {
            path,
            source: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_client_error() {
        let err = InspectError::NotFound(PathBuf::from("missing"));
        assert!(err.is_not_found());
        assert!(!InspectError::Cancelled { visited: 3 }.is_not_found());
    }

    #[test]
    fn test_malformed_message_names_file() {
        let err = InspectError::malformed(Path::new("labels.csv"), "bad quote");
        let message = err.to_string();
        assert!(message.contains("labels.csv"));
        assert!(message.contains("bad quote"));
    }
}

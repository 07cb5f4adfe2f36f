use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the configuration file inside the platform config directory
const CONFIG_FILE_NAME: &str = "config.json";

/// How far an image is decoded before it counts as readable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerifyDepth {
    /// Only the container format and the image dimensions are read
    Header,
    /// The whole pixel stream is decoded
    #[default]
    Full,
}

/// Application configuration
///
/// Every field has a default so a partial (or missing) config file still
/// produces a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Extensions (lowercase, without dot) that are decoded as images
    pub accepted_extensions: Vec<String>,

    /// Decode depth used to decide whether an image is readable
    pub verify: VerifyDepth,

    /// Abort the walk once more than this many files have been visited
    pub max_files: Option<usize>,

    /// Emit a progress message every this many files
    pub progress_interval: usize,

    /// Also write logs to a timestamped file
    pub log_to_file: bool,

    /// Directory for log files (defaults to `./logs`)
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            verify: VerifyDepth::Full,
            max_files: None,
            progress_interval: 100,
            log_to_file: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Check whether an extension is in the accepted set (case-insensitive)
    pub fn is_accepted_extension(&self, extension: &str) -> bool {
        self.accepted_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }

    /// Default location of the config file in the platform config directory
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dataset-inspector")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Read the configuration from `path`, or from the default location when
    /// `path` is `None`. Falls back to defaults if the file doesn't exist or
    /// is corrupted.
    ///
    /// Nothing is logged here because this runs before the subscriber is
    /// installed; call [`ConfigOutcome::log`] once logging is up.
    pub fn read(path: Option<&Path>) -> (Self, ConfigOutcome) {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return (Self::default(), ConfigOutcome::NoConfigDir),
            },
        };

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => (config, ConfigOutcome::Loaded(config_path)),
                Err(e) => (
                    Self::default(),
                    ConfigOutcome::Corrupted {
                        path: config_path,
                        reason: e.to_string(),
                    },
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (Self::default(), ConfigOutcome::Missing(config_path))
            }
            Err(e) => (
                Self::default(),
                ConfigOutcome::Unreadable {
                    path: config_path,
                    reason: e.to_string(),
                },
            ),
        }
    }
}

/// How reading the config file ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    Loaded(PathBuf),
    /// No file at the path, defaults in use
    Missing(PathBuf),
    /// File exists but could not be read, defaults in use
    Unreadable { path: PathBuf, reason: String },
    /// File is not valid config JSON, defaults in use
    Corrupted { path: PathBuf, reason: String },
    /// No platform config directory, defaults in use
    NoConfigDir,
}

impl ConfigOutcome {
    /// Whether the file was unusable and defaults replaced it
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ConfigOutcome::Unreadable { .. } | ConfigOutcome::Corrupted { .. }
        )
    }

    pub fn log(&self) {
        match self {
            ConfigOutcome::Loaded(path) => info!("Loaded config from: {:?}", path),
            ConfigOutcome::Missing(path) => {
                info!("No config file at {:?}. Using defaults.", path)
            }
            ConfigOutcome::Unreadable { path, reason } => {
                warn!("Failed to read config file {:?}: {}. Using defaults.", path, reason)
            }
            ConfigOutcome::Corrupted { path, reason } => {
                warn!("Failed to parse config file {:?}: {}. Using defaults.", path, reason)
            }
            ConfigOutcome::NoConfigDir => {
                warn!("Could not determine config directory. Using defaults.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.accepted_extensions.len(), 7);
        assert_eq!(config.verify, VerifyDepth::Full);
        assert!(config.max_files.is_none());
        assert_eq!(config.progress_interval, 100);
        assert!(!config.log_to_file);
    }

    #[test]
    fn test_accepted_extension_ignores_case() {
        let config = AppConfig::default();
        assert!(config.is_accepted_extension("JPG"));
        assert!(config.is_accepted_extension("Tif"));
        assert!(!config.is_accepted_extension("txt"));
        assert!(!config.is_accepted_extension("webp"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "verify": "header", "max_files": 10 }"#).unwrap();

        let (config, outcome) = AppConfig::read(Some(&path));
        assert_eq!(outcome, ConfigOutcome::Loaded(path.clone()));
        assert_eq!(config.verify, VerifyDepth::Header);
        assert_eq!(config.max_files, Some(10));
        assert_eq!(config.accepted_extensions.len(), 7);
        assert_eq!(config.progress_interval, 100);
    }

    #[test]
    fn test_corrupted_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let (config, outcome) = AppConfig::read(Some(&path));
        assert_eq!(config.verify, VerifyDepth::Full);
        assert!(outcome.is_fallback());
        match outcome {
            ConfigOutcome::Corrupted { path: bad, reason } => {
                assert_eq!(bad, path);
                assert!(!reason.is_empty());
            }
            other => panic!("expected a corrupted config, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, outcome) = AppConfig::read(Some(&dir.path().join("absent.json")));
        assert!(config.max_files.is_none());
        assert!(matches!(outcome, ConfigOutcome::Missing(_)));
        assert!(!outcome.is_fallback());
    }
}

//! Inspection of image classification datasets.
//!
//! Given a dataset directory this crate works out where the class labels come
//! from (a CSV file, a JSON file or one subdirectory per class), checks that
//! every file is a decodable image with an accepted extension, and counts
//! classes and items per class.

pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::{AppConfig, ConfigOutcome, VerifyDepth};
pub use crate::core::{
    inspect_dataset, inspect_dataset_with_progress, AnalysisReport, InspectError,
};

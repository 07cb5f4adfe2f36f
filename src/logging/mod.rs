//! Logging for the dataset inspector
//!
//! This module provides:
//! - Custom log formatting with bracketed output
//! - Logging to stderr, so stdout stays free for the JSON report
//! - An optional timestamped log file

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::setup_logging;

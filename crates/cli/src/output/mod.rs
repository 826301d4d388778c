//! Output formatting utilities
//!
//! This module provides formatters for CLI output in both human-readable
//! and JSON formats. It also handles progress spinners and colored output.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

use bkt_core::config::{ColorMode, Defaults, OutputFormat};

/// Output configuration derived from CLI flags and config defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress spinners
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Fill in settings the command line left off from the config file defaults
    pub fn with_defaults(mut self, defaults: &Defaults) -> Self {
        self.json |= defaults.output == OutputFormat::Json;
        self.no_color |= defaults.color == ColorMode::Never;
        self.no_progress |= !defaults.progress;
        self
    }
}

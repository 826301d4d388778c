//! Output formatter for human-readable and JSON output
//!
//! Messages go to stdout, errors to stderr. Skipped targets are reported
//! through `tracing`, not through the formatter.

use comfy_table::{ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI output
///
/// In JSON mode only documents passed to [`Formatter::json`] reach stdout.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Output configuration this formatter was built with
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Report a completed action
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }

        if self.colors_enabled() {
            println!("{} {message}", style("✓").green());
        } else {
            println!("✓ {message}");
        }
    }

    /// Report a failure that stops the command
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else if self.colors_enabled() {
            eprintln!("{} {message}", style("✗").red());
        } else {
            eprintln!("✗ {message}");
        }
    }

    /// Print a serializable document as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }

    /// Print two-column rows as a table (respects quiet mode)
    pub fn table(&self, header: [&str; 2], rows: Vec<(String, String)>) {
        if self.config.quiet {
            return;
        }
        println!("{}", self.render_table(header, rows));
    }

    fn render_table(&self, header: [&str; 2], rows: Vec<(String, String)>) -> String {
        let mut table = Table::new();
        if self.colors_enabled() {
            table.load_preset(presets::UTF8_FULL);
        } else {
            table.load_preset(presets::ASCII_FULL).force_no_tty();
        }
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header.to_vec());
        for (field, value) in rows {
            table.add_row(vec![field, value]);
        }
        table.to_string()
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

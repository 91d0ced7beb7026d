//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable).

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use schemastore::StoreStats;
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Trait for formatting output values
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Schemas are shown as pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Whether human-readable output is selected
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "writing data");

        // YAML output already ends with a newline
        if formatted.ends_with('\n') {
            write!(self.writer, "{}", formatted)?;
            self.writer.flush()?;
            Ok(())
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write a list of names, one per line
    pub fn names(&mut self, names: &[String]) -> Result<()> {
        for name in names {
            if self.use_color {
                self.writeln(&format!("  {} {}", "•".dimmed(), name))?;
            } else {
                self.writeln(&format!("  - {}", name))?;
            }
        }
        Ok(())
    }

    /// Write store counters as an aligned table
    pub fn stats(&mut self, stats: &StoreStats) -> Result<()> {
        let rows = [
            ("file reads", stats.file_reads),
            ("cache hits", stats.cache_hits),
            ("dependency retries", stats.dependency_retries),
            ("schemas parsed", stats.schemas_parsed),
        ];
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        for (label, value) in rows {
            let label = format!("{:width$}", label, width = width);
            if self.use_color {
                self.writeln(&format!("  {}  {}", label.bold(), value))?;
            } else {
                self.writeln(&format!("  {}  {}", label, value))?;
            }
        }
        Ok(())
    }
}

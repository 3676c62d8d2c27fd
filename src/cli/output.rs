//! Output formatting for CLI commands
//!
//! Every command produces one result value. In JSON mode that value is
//! printed as a single line for scripts; in text mode the command renders
//! it for humans instead.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Where command results and `--verbose` notes go
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a command result: one JSON line, or whatever `text` renders
    pub fn emit<T: Serialize>(&self, data: &T, text: impl FnOnce(&T)) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", json_line(data)?),
            OutputFormat::Text => text(data),
        }
        Ok(())
    }

    /// Prints a one-line status message
    pub fn message(&self, message: &str) -> Result<()> {
        self.emit(
            &serde_json::json!({ "success": true, "message": message }),
            |_| println!("{}", message),
        )
    }

    /// Prints a diagnostic to stderr when `--verbose` is set
    pub fn note(&self, command: &str, message: impl std::fmt::Display) {
        if self.verbose {
            eprintln!("[{}] {}", command, message);
        }
    }
}

fn json_line<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string(data).context("Failed to serialize command output")
}

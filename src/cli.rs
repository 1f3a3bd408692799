//! CLI interface for the CV screener

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cv-screener")]
#[command(about = "Internal analytics console: CV screening, ranking and comparison")]
#[command(long_about = "Score a batch of candidate CVs against a job description, \
rank them, and compare two candidates side by side. Also exposes the console's \
dashboard and ETL upload collaborators.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score and rank a batch of CVs against a job description
    Screen {
        /// Path to the job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Candidate CV files (PDF, TXT, MD)
        cvs: Vec<PathBuf>,

        /// Select a candidate (by file name) for comparison; repeat to
        /// select two
        #[arg(short, long)]
        select: Vec<String>,

        /// Output format: console, json, markdown
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Include per-criterion justifications
        #[arg(short, long)]
        detailed: bool,

        /// Override the configured concurrency bound
        #[arg(long)]
        concurrency: Option<usize>,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Show a dashboard KPI snapshot
    Dashboard {
        #[command(subcommand)]
        view: DashboardView,
    },

    /// Upload a spreadsheet to an ETL endpoint (requires ops or admin)
    Etl {
        /// Endpoint tag: pr or vagas
        endpoint: String,

        /// Spreadsheet file to upload
        file: PathBuf,

        /// Role to act as: viewer, ops or admin
        #[arg(long, default_value = "viewer")]
        role: String,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum DashboardView {
    /// Profit & loss snapshot
    Pnl,
    /// Headcount by seniority
    Headcount,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn output_format_parsing() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn extension_validation() {
        let path = PathBuf::from("cv.PDF");
        assert!(validate_file_extension(&path, &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(&path, &["txt"]).is_err());
    }
}

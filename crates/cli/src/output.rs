//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output. Colours honour
//! `owo_colors::set_override`, so `--no-color` turns them off everywhere.

use droidconf_core::error::Error;
use droidconf_core::validation::{ValidationError, ValidationResult};
use owo_colors::{OwoColorize, Stream};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!(
            "{} {}",
            "✓".if_supports_color(Stream::Stdout, |t| t.green()),
            message
        );
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!(
            "{} {}",
            "✗".if_supports_color(Stream::Stderr, |t| t.red()),
            message
        );
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!(
            "{} {}",
            "⚠".if_supports_color(Stream::Stderr, |t| t.yellow()),
            message
        );
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!(
            "{} {}",
            "ℹ".if_supports_color(Stream::Stdout, |t| t.blue()),
            message
        );
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.if_supports_color(Stream::Stdout, |t| t.bold()));
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label  value` line
    pub fn field(label: &str, value: impl std::fmt::Display) {
        let padded = format!("{:<width$}", label, width = FIELD_WIDTH);
        println!(
            "  {} {}",
            padded.if_supports_color(Stream::Stdout, |t| t.dimmed()),
            value
        );
    }

    /// Print a secondary line under an error or warning
    fn detail(label: &str, text: &str) {
        eprintln!(
            "  {} {}",
            format!("{}:", label).if_supports_color(Stream::Stderr, |t| t.dimmed()),
            text
        );
    }
}

/// Label column width for [`Status::field`]
const FIELD_WIDTH: usize = 22;

/// Print a coded error with its context and suggestion
pub fn print_error(err: &Error) {
    Status::error(&format!("[{}] {}", err.code, err.message));
    if let Some(context) = &err.context {
        Status::detail("at", context);
    }
    if let Some(suggestion) = &err.suggestion {
        Status::detail("help", suggestion);
    }
}

/// Print every error and warning in a validation result
pub fn print_findings(result: &ValidationResult) {
    for error in result.errors() {
        Status::error(&describe_finding(error));
    }
    for warning in result.warnings() {
        Status::warning(&describe_finding(warning));
    }
}

/// One-line description of a finding: `CODE field: message`
pub fn describe_finding(finding: &ValidationError) -> String {
    format!("{} {}", finding.code, finding)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Output format for machine-readable command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// TOML
    Toml,
}

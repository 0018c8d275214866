//! Core domain models for line length violations and run results
//!
//! Architecture: Rich Domain Models - a Violation knows how to describe itself
//! - Violations carry the exact diagnostic line printed by the CLI
//! - CheckReport acts as the aggregate for collect-all runs
//! - Errors separate validation failures from setup failures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The two ways a line can disagree with the configured limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A line that is not whitelisted exceeds the maximum
    LineTooLong,
    /// A whitelisted line no longer exceeds the maximum
    StaleException,
}

impl ViolationKind {
    /// Phrase used at the start of the diagnostic message
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LineTooLong => "line too long",
            Self::StaleException => "line not too long",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line that fails the length check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// What went wrong
    pub kind: ViolationKind,
    /// Path of the file as it was walked (root joined with the relative path)
    pub file_path: PathBuf,
    /// Line number (1-indexed)
    pub line_number: usize,
    /// Measured length of the stripped line
    pub length: usize,
    /// Maximum length in force for the run
    pub max_length: usize,
    /// The line with trailing whitespace removed
    pub content: String,
}

impl Violation {
    /// Create a new violation
    pub fn new(
        kind: ViolationKind,
        file_path: PathBuf,
        line_number: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            file_path,
            line_number,
            length: 0,
            max_length: 0,
            content: content.into(),
        }
    }

    /// Record the measured length against the limit
    pub fn with_measurement(mut self, length: usize, max_length: usize) -> Self {
        self.length = length;
        self.max_length = max_length;
        self
    }

    /// Format violation for display
    pub fn format_display(&self) -> String {
        format!(
            "{}: {}: {} {}",
            self.kind.as_str(),
            self.file_path.display(),
            self.line_number,
            self.content
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_display())
    }
}

/// Totals for a run that found nothing wrong
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of candidate files read
    pub files_checked: usize,
    /// Sum of the per-file line counts
    pub lines_checked: usize,
}

impl RunSummary {
    /// Add one file's line count
    pub fn add_file(&mut self, lines: usize) {
        self.files_checked += 1;
        self.lines_checked += lines;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines checked", self.lines_checked)
    }
}

/// Result of a collect-all run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckReport {
    /// Every violation found, in file then line order
    pub violations: Vec<Violation>,
    /// Totals over all files, including files with violations
    pub summary: RunSummary,
}

impl CheckReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Count violations of one kind
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Sort violations by file path and line number for consistent output
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| {
            a.file_path
                .to_string_lossy()
                .cmp(&b.file_path.to_string_lossy())
                .then_with(|| a.line_number.cmp(&b.line_number))
        });
    }

    /// First violation in sorted order, the one a fail-fast run would report
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// Error types that can occur during a run
#[derive(Debug, thiserror::Error)]
pub enum LineGuardError {
    /// Configuration file could not be loaded, parsed or validated
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The tree under the root could not be walked completely
    #[error("Discovery error under {root}: {message}")]
    Discovery { root: PathBuf, message: String },

    /// A candidate file could not be read as text
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report could not be rendered
    #[error("Report error: {message}")]
    Report { message: String },

    /// Other I/O failures
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// An unexcepted line exceeds the maximum
    #[error("{0}")]
    LineTooLong(Violation),

    /// A whitelisted line is no longer too long
    #[error("{0}")]
    StaleException(Violation),
}

impl LineGuardError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a discovery error
    pub fn discovery(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a report rendering error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create a read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a line length finding rather than a setup failure
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::LineTooLong(_) | Self::StaleException(_))
    }

    /// The violation carried by this error, if any
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::LineTooLong(v) | Self::StaleException(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Violation> for LineGuardError {
    fn from(violation: Violation) -> Self {
        match violation.kind {
            ViolationKind::LineTooLong => Self::LineTooLong(violation),
            ViolationKind::StaleException => Self::StaleException(violation),
        }
    }
}

/// Result type for line-guard operations
pub type LineGuardResult<T> = Result<T, LineGuardError>;

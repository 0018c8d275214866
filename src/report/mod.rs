//! Report rendering for run outcomes
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - Human output keeps the fixed `<N> lines checked` summary and the diagnostic line shape
//! - JSON output is for programmatic consumption
//! - Which stream a string goes to is left to the caller

use crate::domain::violations::{
    CheckReport, LineGuardError, LineGuardResult, RunSummary, Violation, ViolationKind,
};
use chrono::Utc;
use serde_json::Value as JsonValue;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one diagnostic per line
    #[default]
    Human,
    /// JSON document on standard output
    Json,
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to color the diagnostic phrase (human format only)
    pub use_colors: bool,
    /// Limit reported to JSON consumers
    pub max_line_length: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: false,
            max_line_length: crate::config::DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a clean fail-fast run
    pub fn format_summary(
        &self,
        summary: &RunSummary,
        format: OutputFormat,
    ) -> LineGuardResult<String> {
        match format {
            OutputFormat::Human => Ok(summary.to_string()),
            OutputFormat::Json => self.format_json(&[], Some(summary)),
        }
    }

    /// Format the single violation that stopped a fail-fast run
    pub fn format_failure(
        &self,
        violation: &Violation,
        format: OutputFormat,
    ) -> LineGuardResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_violation(violation)),
            OutputFormat::Json => self.format_json(&[violation], None),
        }
    }

    /// Format a collect-all run
    pub fn format_report(
        &self,
        report: &CheckReport,
        format: OutputFormat,
    ) -> LineGuardResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => {
                let violations: Vec<&Violation> = report.violations.iter().collect();
                self.format_json(&violations, Some(&report.summary))
            }
        }
    }

    /// One diagnostic line: `line too long: <file>: <line> <content>`
    pub fn format_violation(&self, violation: &Violation) -> String {
        if !self.options.use_colors {
            return violation.format_display();
        }

        format!(
            "{}: {}: {} {}",
            paint(violation.kind),
            violation.file_path.display(),
            violation.line_number,
            violation.content
        )
    }

    fn format_human(&self, report: &CheckReport) -> String {
        if !report.has_violations() {
            return report.summary.to_string();
        }

        let mut output = String::new();
        for violation in &report.violations {
            output.push_str(&self.format_violation(violation));
            output.push('\n');
        }

        let too_long = report.count(ViolationKind::LineTooLong);
        let stale = report.count(ViolationKind::StaleException);
        output.push_str(&format!(
            "{} violation{} ({} too long, {} stale exception{}) in {}",
            report.violations.len(),
            if report.violations.len() == 1 { "" } else { "s" },
            too_long,
            stale,
            if stale == 1 { "" } else { "s" },
            report.summary
        ));
        output
    }

    fn format_json(
        &self,
        violations: &[&Violation],
        summary: Option<&RunSummary>,
    ) -> LineGuardResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "kind": v.kind,
                    "message": v.kind.as_str(),
                    "file": v.file_path.display().to_string(),
                    "line": v.line_number,
                    "length": v.length,
                    "content": v.content,
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "status": if violations.is_empty() { "ok" } else { "failed" },
            "files_checked": summary.map(|s| s.files_checked),
            "lines_checked": summary.map(|s| s.lines_checked),
            "max_line_length": self.options.max_line_length,
            "checked_at": Utc::now().to_rfc3339(),
            "violations": json_violations,
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| LineGuardError::report(format!("JSON serialization failed: {e}")))
    }
}

#[cfg(feature = "colors")]
fn paint(kind: ViolationKind) -> String {
    use colored::Colorize;
    match kind {
        ViolationKind::LineTooLong => kind.as_str().red().bold().to_string(),
        ViolationKind::StaleException => kind.as_str().yellow().bold().to_string(),
    }
}

#[cfg(not(feature = "colors"))]
fn paint(kind: ViolationKind) -> String {
    kind.as_str().to_string()
}

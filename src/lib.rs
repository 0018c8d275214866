//! line-guard - source line length enforcement
//!
//! Architecture: Library interface serves as the application layer
//! - Discovery produces the sorted candidate list
//! - The checker reconciles each file against the limit and the whitelist
//! - LineGuard drives both and aggregates the outcome

pub mod checker;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod report;

// Re-export main types for convenient access
pub use domain::violations::{
    CheckReport, LineGuardError, LineGuardResult, RunSummary, Violation, ViolationKind,
};

pub use config::{ConfigBuilder, ExceptionSet, LineException, LineGuardConfig};

pub use checker::{FileScan, LineChecker};

pub use discovery::{CandidateFile, FileDiscoverer, PathFilter};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Check files on the rayon pool instead of one after another
    pub parallel: bool,
}

/// Main entry point: discovers files under a root and checks every line
pub struct LineGuard {
    config: LineGuardConfig,
    discoverer: FileDiscoverer,
    checker: LineChecker,
}

impl LineGuard {
    /// Create a new linter with the given configuration
    pub fn new(config: LineGuardConfig) -> LineGuardResult<Self> {
        config.validate()?;
        let discoverer = FileDiscoverer::from_config(&config)?;
        let checker = LineChecker::from_config(&config);

        Ok(Self {
            config,
            discoverer,
            checker,
        })
    }

    /// Create a linter with default configuration
    pub fn with_defaults() -> LineGuardResult<Self> {
        Self::new(LineGuardConfig::default())
    }

    /// Create a linter loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> LineGuardResult<Self> {
        Self::new(LineGuardConfig::load_from_file(path)?)
    }

    pub fn config(&self) -> &LineGuardConfig {
        &self.config
    }

    /// Sorted candidate files under `root`
    pub fn discover<P: AsRef<Path>>(&self, root: P) -> LineGuardResult<Vec<CandidateFile>> {
        self.discoverer.find_files(root)
    }

    /// Check every candidate under `root`, stopping at the first violation
    pub fn check<P: AsRef<Path>>(
        &self,
        root: P,
        options: &CheckOptions,
    ) -> LineGuardResult<RunSummary> {
        let start_time = Instant::now();
        let files = self.discover(&root)?;
        self.log_unmatched_exceptions(&files);

        let summary = self.check_files(&files, options)?;

        tracing::debug!(
            "Checked {} lines in {} files under {} in {}ms",
            summary.lines_checked,
            summary.files_checked,
            root.as_ref().display(),
            start_time.elapsed().as_millis()
        );
        Ok(summary)
    }

    /// Check every candidate under `root`, collecting all violations
    ///
    /// Read and discovery failures still abort the run.
    pub fn check_all<P: AsRef<Path>>(
        &self,
        root: P,
        options: &CheckOptions,
    ) -> LineGuardResult<CheckReport> {
        let start_time = Instant::now();
        let files = self.discover(&root)?;
        self.log_unmatched_exceptions(&files);

        let report = self.scan_files(&files, options)?;

        tracing::debug!(
            "Found {} violations in {} lines under {} in {}ms",
            report.violations.len(),
            report.summary.lines_checked,
            root.as_ref().display(),
            start_time.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Check an explicit candidate list in order, stopping at the first violation
    pub fn check_files(
        &self,
        files: &[CandidateFile],
        options: &CheckOptions,
    ) -> LineGuardResult<RunSummary> {
        let mut summary = RunSummary::default();

        if options.parallel && files.len() > 1 {
            let counts = files
                .par_iter()
                .map(|file| self.checker.check_file(file))
                .collect::<LineGuardResult<Vec<usize>>>()?;
            for lines in counts {
                summary.add_file(lines);
            }
        } else {
            for file in files {
                summary.add_file(self.checker.check_file(file)?);
            }
        }

        Ok(summary)
    }

    /// Scan an explicit candidate list, keeping every violation
    pub fn scan_files(
        &self,
        files: &[CandidateFile],
        options: &CheckOptions,
    ) -> LineGuardResult<CheckReport> {
        let scans = if options.parallel && files.len() > 1 {
            files
                .par_iter()
                .map(|file| self.checker.scan_file(file))
                .collect::<LineGuardResult<Vec<FileScan>>>()?
        } else {
            files
                .iter()
                .map(|file| self.checker.scan_file(file))
                .collect::<LineGuardResult<Vec<FileScan>>>()?
        };

        let mut report = CheckReport::new();
        for scan in scans {
            report.summary.add_file(scan.lines);
            report.violations.extend(scan.violations);
        }
        report.sort_violations();

        Ok(report)
    }

    fn log_unmatched_exceptions(&self, files: &[CandidateFile]) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }

        let seen: HashSet<PathBuf> = files.iter().map(|f| f.relative.clone()).collect();
        for (file, line) in self.checker.exceptions().unmatched(&seen) {
            tracing::debug!(
                "Exception {}:{} names a file that was not discovered",
                file.display(),
                line
            );
        }
    }
}

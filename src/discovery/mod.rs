//! Candidate file discovery
//!
//! Walks the whole tree under a root and returns the files to check, sorted by full path
//! string. Any unreadable entry aborts discovery: a partial candidate list would let
//! violations slip through.

pub mod path_filter;

pub use path_filter::PathFilter;

use crate::config::exceptions::normalize;
use crate::config::LineGuardConfig;
use crate::domain::violations::{LineGuardError, LineGuardResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file selected for checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path used to open the file and in diagnostics (root joined with `relative`)
    pub path: PathBuf,
    /// Path relative to the root, used for exception lookup
    pub relative: PathBuf,
}

impl CandidateFile {
    /// Create a candidate from a root and a root-relative path
    pub fn new(root: &Path, relative: impl Into<PathBuf>) -> Self {
        let relative: PathBuf = relative.into();
        let relative = normalize(&relative);
        Self {
            path: root.join(&relative),
            relative,
        }
    }
}

/// Recursive, deterministic file discoverer
#[derive(Debug, Clone)]
pub struct FileDiscoverer {
    filter: PathFilter,
}

impl FileDiscoverer {
    /// Create a discoverer with the given filter
    pub fn new(filter: PathFilter) -> Self {
        Self { filter }
    }

    /// Create a discoverer from configuration
    pub fn from_config(config: &LineGuardConfig) -> LineGuardResult<Self> {
        Ok(Self::new(PathFilter::from_config(config)?))
    }

    /// The filter applied to every walked file
    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Get all candidate files under `root`, sorted by full path string
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> LineGuardResult<Vec<CandidateFile>> {
        let root = root.as_ref();

        let metadata = std::fs::metadata(root)
            .map_err(|e| LineGuardError::discovery(root, format!("cannot read root: {e}")))?;
        if !metadata.is_dir() {
            return Err(LineGuardError::discovery(root, "root is not a directory"));
        }

        let mut relative_paths = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let location = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                LineGuardError::discovery(root, format!("{location}: {e}"))
            })?;

            // Symlinked directories are not descended into; symlinked files are checked
            if !entry.path().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).map_err(|e| {
                LineGuardError::discovery(
                    root,
                    format!("{} is outside the root: {e}", entry.path().display()),
                )
            })?;
            relative_paths.push(relative.to_path_buf());
        }

        let walked = relative_paths.len();
        let candidates: Vec<CandidateFile> = self
            .filter
            .filter_paths(&relative_paths)
            .into_iter()
            .map(|relative| CandidateFile::new(root, relative))
            .collect();

        tracing::debug!(
            "Discovered {} candidate files out of {} under {}",
            candidates.len(),
            walked,
            root.display()
        );

        Ok(candidates)
    }
}

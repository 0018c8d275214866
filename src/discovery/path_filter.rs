//! Path filtering by extension, excluded markers and glob patterns
//!
//! Architectural Principle: Service Layer - PathFilter owns the rules for which files are
//! candidates. It works on root-relative paths only, so it can be exercised with a fixed
//! list of paths and no filesystem.

use crate::config::LineGuardConfig;
use crate::domain::violations::{LineGuardError, LineGuardResult};
use std::path::{Component, Path, PathBuf};

/// Decides whether a root-relative path is a candidate file
#[derive(Debug, Clone)]
pub struct PathFilter {
    /// Suffix the full path must end with
    extension: String,
    /// Substrings of the rooted path that exclude it
    excluded_markers: Vec<String>,
    /// Glob exclusions
    patterns: Vec<glob::Pattern>,
}

impl PathFilter {
    /// Create a new path filter
    pub fn new(
        extension: impl Into<String>,
        excluded_markers: Vec<String>,
        exclude_patterns: &[String],
    ) -> LineGuardResult<Self> {
        let patterns = exclude_patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    LineGuardError::config(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<LineGuardResult<Vec<_>>>()?;

        Ok(Self {
            extension: extension.into(),
            excluded_markers,
            patterns,
        })
    }

    /// Create a filter from configuration
    pub fn from_config(config: &LineGuardConfig) -> LineGuardResult<Self> {
        Self::new(
            config.extension.clone(),
            config.excluded_markers.clone(),
            &config.exclude_patterns,
        )
    }

    /// Check if a root-relative path should be checked
    pub fn should_check<P: AsRef<Path>>(&self, relative: P) -> bool {
        let rooted = rooted_string(relative.as_ref());

        if !rooted.ends_with(&self.extension) {
            return false;
        }

        if self.excluded_markers.iter().any(|m| rooted.contains(m.as_str())) {
            return false;
        }

        let unrooted = &rooted[1..];
        !self.patterns.iter().any(|p| p.matches(unrooted))
    }

    /// Filter a list of root-relative paths, sorted by path string
    pub fn filter_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        let mut filtered = Vec::new();

        for path in paths {
            if self.should_check(path) {
                filtered.push(path.as_ref().to_path_buf());
            }
        }

        sort_by_path_string(&mut filtered);
        filtered
    }
}

/// Render a relative path as `/a/b/c.rs` with `/` separators and no `.` components
fn rooted_string(path: &Path) -> String {
    let mut rooted = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            rooted.push('/');
            rooted.push_str(&part.to_string_lossy());
        }
    }
    if rooted.is_empty() {
        rooted.push('/');
    }
    rooted
}

/// Sort lexicographically by the full path string
pub(crate) fn sort_by_path_string(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
}

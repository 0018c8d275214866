//! Configuration loading and management for line-guard
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Compiled-in defaults are the configuration of record
//! - A YAML file may override any field, missing fields keep their defaults
//! - The loaded configuration is validated once and never mutated during a run

pub mod exceptions;

pub use exceptions::{builtin_exceptions, ExceptionSet, LineException};

use crate::domain::violations::{LineGuardError, LineGuardResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default maximum line length in characters
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// Default source file suffix
pub const DEFAULT_EXTENSION: &str = ".rs";

/// Config file names tried in the working directory when none is given
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["line-guard.yaml", "line-guard.yml", ".line-guard.yaml"];

/// Main configuration structure for line-guard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineGuardConfig {
    /// Longest permitted line, in characters after trailing whitespace is stripped
    pub max_line_length: usize,
    /// Suffix a path must end with to be checked
    pub extension: String,
    /// Substrings that exclude a path (build output, editor history)
    pub excluded_markers: Vec<String>,
    /// Extra glob patterns matched against the root-relative path
    pub exclude_patterns: Vec<String>,
    /// Expand tabs to this many columns before measuring; a tab is one character if unset
    pub tab_width: Option<usize>,
    /// Lines approved, and required, to exceed the limit
    pub exceptions: Vec<LineException>,
}

impl LineGuardConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LineGuardResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            LineGuardError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            LineGuardError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> LineGuardResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| LineGuardError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Find a config file in `dir` by the default names, falling back to the defaults
    pub fn discover_in<P: AsRef<Path>>(dir: P) -> LineGuardResult<Self> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                tracing::debug!("Using config file {}", candidate.display());
                return Self::load_from_file(candidate);
            }
        }
        Ok(Self::with_defaults())
    }

    /// Get default configuration with the built-in whitelist
    pub fn with_defaults() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            extension: DEFAULT_EXTENSION.to_string(),
            excluded_markers: vec!["/target/".to_string(), ".history".to_string()],
            exclude_patterns: Vec::new(),
            tab_width: None,
            exceptions: builtin_exceptions(),
        }
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> LineGuardResult<()> {
        if self.max_line_length == 0 {
            return Err(LineGuardError::config("max_line_length must be at least 1"));
        }

        if self.extension.is_empty() {
            return Err(LineGuardError::config("extension must not be empty"));
        }

        if self.excluded_markers.iter().any(String::is_empty) {
            return Err(LineGuardError::config(
                "excluded_markers must not contain an empty marker",
            ));
        }

        if self.tab_width == Some(0) {
            return Err(LineGuardError::config("tab_width must be at least 1"));
        }

        for pattern in &self.exclude_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                LineGuardError::config(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
        }

        if let Some(bad) = self.exceptions.iter().find(|e| e.line == 0) {
            return Err(LineGuardError::config(format!(
                "Exception for '{}' has line 0, line numbers start at 1",
                bad.file.display()
            )));
        }

        Ok(())
    }

    /// Build the lookup set for the configured exceptions
    pub fn exception_set(&self) -> ExceptionSet {
        ExceptionSet::new(&self.exceptions)
    }

    /// Convert to YAML for display
    pub fn to_yaml(&self) -> LineGuardResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LineGuardError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for LineGuardConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: LineGuardConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LineGuardConfig::default(),
        }
    }

    /// Set the maximum line length
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.config.max_line_length = max;
        self
    }

    /// Set the source file suffix
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.config.extension = extension.into();
        self
    }

    /// Add an excluded path marker
    pub fn add_excluded_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.excluded_markers.push(marker.into());
        self
    }

    /// Add an exclude glob pattern
    pub fn add_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.exclude_patterns.push(pattern.into());
        self
    }

    /// Expand tabs to the given width
    pub fn tab_width(mut self, width: usize) -> Self {
        self.config.tab_width = Some(width);
        self
    }

    /// Remove every exception, including the built-in ones
    pub fn clear_exceptions(mut self) -> Self {
        self.config.exceptions.clear();
        self
    }

    /// Whitelist a line
    pub fn add_exception(mut self, file: impl Into<std::path::PathBuf>, line: usize) -> Self {
        self.config.exceptions.push(LineException::new(file, line));
        self
    }

    /// Build the final configuration
    pub fn build(self) -> LineGuardResult<LineGuardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LineGuardConfig::default();

        assert_eq!(config.max_line_length, 100);
        assert_eq!(config.extension, ".rs");
        assert_eq!(config.excluded_markers, vec!["/target/", ".history"]);
        assert_eq!(config.tab_width, None);
        assert!(!config.exceptions.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> LineGuardResult<()> {
        let config = LineGuardConfig::load_from_str(
            "max_line_length: 80\nexceptions:\n  - file: ./src/lib.rs\n    line: 12\n",
        )?;

        assert_eq!(config.max_line_length, 80);
        assert_eq!(config.extension, ".rs");
        assert_eq!(config.exceptions, vec![LineException::new("./src/lib.rs", 12)]);
        assert!(config.exception_set().contains(&PathBuf::from("src/lib.rs"), 12));
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_values() {
        for yaml in [
            "max_line_length: 0",
            "extension: ''",
            "tab_width: 0",
            "exclude_patterns: ['[invalid']",
            "exceptions:\n  - file: a.rs\n    line: 0\n",
            "excluded_markers: ['']",
        ] {
            let result = LineGuardConfig::load_from_str(yaml);
            assert!(
                matches!(result, Err(LineGuardError::Configuration { .. })),
                "accepted: {yaml}"
            );
        }
    }

    #[test]
    fn test_unparseable_yaml() {
        let result = LineGuardConfig::load_from_str("max_line_length: [not a number");
        assert!(matches!(result, Err(LineGuardError::Configuration { .. })));
    }

    #[test]
    fn test_discover_in_prefers_first_name() -> LineGuardResult<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join(".line-guard.yaml"), "max_line_length: 60\n")?;
        fs::write(temp_dir.path().join("line-guard.yml"), "max_line_length: 70\n")?;

        let config = LineGuardConfig::discover_in(temp_dir.path())?;
        assert_eq!(config.max_line_length, 70);
        Ok(())
    }

    #[test]
    fn test_discover_in_falls_back_to_defaults() -> LineGuardResult<()> {
        let temp_dir = TempDir::new()?;
        let config = LineGuardConfig::discover_in(temp_dir.path())?;
        assert_eq!(config, LineGuardConfig::with_defaults());
        Ok(())
    }

    #[test]
    fn test_builder() -> LineGuardResult<()> {
        let config = ConfigBuilder::new()
            .max_line_length(120)
            .extension(".rs")
            .add_excluded_marker("/vendor/")
            .clear_exceptions()
            .add_exception("src/main.rs", 4)
            .add_exclude_pattern("**/generated/**")
            .tab_width(4)
            .build()?;

        assert_eq!(config.max_line_length, 120);
        assert_eq!(config.exceptions.len(), 1);
        assert_eq!(config.tab_width, Some(4));
        assert_eq!(config.excluded_markers.last().map(String::as_str), Some("/vendor/"));
        assert!(ConfigBuilder::new().max_line_length(0).build().is_err());
        Ok(())
    }

    #[test]
    fn test_yaml_round_trip_preserves_exceptions() -> LineGuardResult<()> {
        let config = ConfigBuilder::new()
            .clear_exceptions()
            .add_exception("a.rs", 3)
            .build()?;

        let reloaded = LineGuardConfig::load_from_str(&config.to_yaml()?)?;
        assert_eq!(reloaded, config);
        Ok(())
    }
}

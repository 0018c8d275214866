//! Built-in whitelist of lines approved to exceed the length limit
//!
//! Mostly long Markdown table rows and links in documentation comments. Paths are relative
//! to the root of the checked tree.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One whitelisted line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineException {
    /// File path relative to the checked root
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
}

impl LineException {
    /// Create a new exception entry
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// Immutable lookup set of whitelisted (file, line) pairs
#[derive(Debug, Clone, Default)]
pub struct ExceptionSet {
    entries: HashSet<(PathBuf, usize)>,
}

impl ExceptionSet {
    /// Build a set from configured entries, normalizing each path
    pub fn new<'a>(exceptions: impl IntoIterator<Item = &'a LineException>) -> Self {
        let entries = exceptions
            .into_iter()
            .map(|e| (normalize(&e.file), e.line))
            .collect();
        Self { entries }
    }

    /// Whether the given root-relative file and line are whitelisted
    pub fn contains(&self, file: &Path, line: usize) -> bool {
        self.entries.contains(&(normalize(file), line))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose file is not among the given root-relative keys
    pub fn unmatched<'a>(
        &'a self,
        files: &'a HashSet<PathBuf>,
    ) -> impl Iterator<Item = &'a (PathBuf, usize)> + 'a {
        self.entries.iter().filter(move |(file, _)| !files.contains(file))
    }
}

/// Drop `.` components so `./a/b.rs` and `a/b.rs` compare equal
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

const BUILTIN: &[(&str, usize)] = &[
    ("./malachite-base/src/lib.rs", 65),
    ("./malachite-base/src/num/arithmetic/mod.rs", 333),
    ("./malachite-base/src/num/arithmetic/mod.rs", 334),
    ("./malachite-base/src/num/arithmetic/mod.rs", 1334),
    ("./malachite-base/src/num/arithmetic/mod.rs", 1574),
    ("./malachite-base/src/num/arithmetic/mod.rs", 1575),
    ("./malachite-base/src/num/arithmetic/mod.rs", 1576),
    ("./malachite-base/src/num/arithmetic/mod.rs", 1577),
    ("./malachite-base/src/num/arithmetic/primorial.rs", 85),
    ("./malachite-base/src/num/arithmetic/primorial.rs", 244),
    ("./malachite-base/src/num/arithmetic/round_to_multiple_of_power_of_2.rs", 118),
    ("./malachite-base/src/num/conversion/digits/power_of_2_digit_iterable.rs", 154),
    ("./malachite-base/src/num/conversion/digits/power_of_2_digit_iterable.rs", 156),
    ("./malachite-base/src/num/exhaustive/mod.rs", 1084),
    ("./malachite-float/src/conversion/mantissa_and_exponent.rs", 452),
    ("./malachite-float/src/conversion/mantissa_and_exponent.rs", 641),
    ("./malachite-float/src/conversion/mod.rs", 225),
    ("./malachite-float/src/lib.rs", 24),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 35),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 36),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 37),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 72),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 73),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 84),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 85),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 86),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 115),
    ("./malachite-nz/src/integer/arithmetic/mod.rs", 117),
    ("./malachite-nz/src/lib.rs", 36),
    ("./malachite-nz/src/lib.rs", 103),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 42),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 43),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 44),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 146),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 147),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 170),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 171),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 172),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 555),
    ("./malachite-nz/src/natural/arithmetic/mod.rs", 557),
    ("./malachite-nz/src/natural/conversion/digits/power_of_2_digit_iterable.rs", 529),
    ("./malachite-nz/src/natural/conversion/digits/power_of_2_digit_iterable.rs", 531),
    ("./malachite-nz/src/natural/conversion/digits/power_of_2_digit_iterable.rs", 834),
    ("./malachite-nz/src/natural/conversion/digits/power_of_2_digit_iterable.rs", 836),
    ("./malachite-nz/src/natural/conversion/mantissa_and_exponent.rs", 323),
    ("./malachite-nz/src/natural/conversion/mantissa_and_exponent.rs", 508),
    ("./malachite-nz/src/natural/conversion/mod.rs", 257),
    ("./malachite-q/src/arithmetic/mod.rs", 79),
    ("./malachite-q/src/arithmetic/mod.rs", 81),
    ("./malachite-q/src/conversion/string/from_sci_string.rs", 145),
    ("./malachite-q/src/conversion/string/from_sci_string.rs", 232),
    ("./malachite-q/src/lib.rs", 54),
];

/// The compiled-in whitelist
pub fn builtin_exceptions() -> Vec<LineException> {
    BUILTIN
        .iter()
        .map(|&(file, line)| LineException::new(file, line))
        .collect()
}

//! Per-file line length checking
//!
//! CDD Principle: Domain Services - LineChecker reconciles every line of a file against the
//! limit and the whitelist
//! - Unexcepted lines must be at most the maximum
//! - Excepted lines must be over the maximum, otherwise the whitelist is stale
//! - Length is counted in characters after trailing whitespace is stripped

use crate::config::{ExceptionSet, LineGuardConfig};
use crate::discovery::CandidateFile;
use crate::domain::violations::{LineGuardError, LineGuardResult, Violation, ViolationKind};
use std::fs;

/// Checks files against a maximum line length and a whitelist
#[derive(Debug, Clone)]
pub struct LineChecker {
    max_line_length: usize,
    tab_width: Option<usize>,
    exceptions: ExceptionSet,
}

/// Every line of one file inspected, with all violations kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Number of lines in the file
    pub lines: usize,
    /// Violations in line order
    pub violations: Vec<Violation>,
}

impl LineChecker {
    /// Create a new checker
    pub fn new(max_line_length: usize, tab_width: Option<usize>, exceptions: ExceptionSet) -> Self {
        Self {
            max_line_length,
            tab_width,
            exceptions,
        }
    }

    /// Create a checker from configuration
    pub fn from_config(config: &LineGuardConfig) -> Self {
        Self::new(config.max_line_length, config.tab_width, config.exception_set())
    }

    pub fn exceptions(&self) -> &ExceptionSet {
        &self.exceptions
    }

    /// Length of a line as compared against the maximum
    pub fn measure(&self, line: &str) -> usize {
        let stripped = strip_trailing(line);
        match self.tab_width {
            None => stripped.chars().count(),
            Some(width) => stripped.chars().fold(0, |column, c| {
                if c == '\t' {
                    (column / width + 1) * width
                } else {
                    column + 1
                }
            }),
        }
    }

    /// Read a file and check it, stopping at the first violation
    ///
    /// Returns the number of lines in the file.
    pub fn check_file(&self, file: &CandidateFile) -> LineGuardResult<usize> {
        let content = read_source(file)?;
        self.check_content(file, &content)
    }

    /// Read a file and collect every violation in it
    pub fn scan_file(&self, file: &CandidateFile) -> LineGuardResult<FileScan> {
        let content = read_source(file)?;
        Ok(self.scan_content(file, &content))
    }

    /// Check already loaded content, stopping at the first violation
    pub fn check_content(&self, file: &CandidateFile, content: &str) -> LineGuardResult<usize> {
        let mut lines = 0;
        for (index, line) in split_lines(content).enumerate() {
            if let Some(violation) = self.inspect_line(file, index + 1, line) {
                return Err(violation.into());
            }
            lines += 1;
        }
        Ok(lines)
    }

    /// Check already loaded content, keeping every violation
    pub fn scan_content(&self, file: &CandidateFile, content: &str) -> FileScan {
        let mut scan = FileScan::default();
        for (index, line) in split_lines(content).enumerate() {
            scan.lines += 1;
            if let Some(violation) = self.inspect_line(file, index + 1, line) {
                scan.violations.push(violation);
            }
        }
        scan
    }

    fn inspect_line(
        &self,
        file: &CandidateFile,
        line_number: usize,
        line: &str,
    ) -> Option<Violation> {
        let length = self.measure(line);
        let is_excepted = self.exceptions.contains(&file.relative, line_number);

        let kind = match (is_excepted, length > self.max_line_length) {
            (true, false) => ViolationKind::StaleException,
            (false, true) => ViolationKind::LineTooLong,
            _ => return None,
        };

        Some(
            Violation::new(kind, file.path.clone(), line_number, strip_trailing(line))
                .with_measurement(length, self.max_line_length),
        )
    }
}

/// Lines terminated by `\n`, `\r\n` or a lone `\r`; no empty line after a final terminator
fn split_lines(content: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(|c: char| c == '\r' || c == '\n') else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

/// Drop trailing whitespace, counting the ASCII separators `\x1c`..=`\x1f` as whitespace
fn strip_trailing(line: &str) -> &str {
    line.trim_end_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

fn read_source(file: &CandidateFile) -> LineGuardResult<String> {
    let content =
        fs::read_to_string(&file.path).map_err(|e| LineGuardError::read(&file.path, e))?;
    tracing::debug!("Checking {} ({} bytes)", file.path.display(), content.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineException;
    use rstest::rstest;
    use std::path::Path;
    use tempfile::TempDir;

    fn candidate() -> CandidateFile {
        CandidateFile::new(Path::new("."), "src/lib.rs")
    }

    fn checker(max: usize, exceptions: &[(&str, usize)]) -> LineChecker {
        let entries: Vec<_> = exceptions
            .iter()
            .map(|&(file, line)| LineException::new(file, line))
            .collect();
        LineChecker::new(max, None, ExceptionSet::new(&entries))
    }

    #[rstest]
    #[case("a".repeat(100), true)]
    #[case("a".repeat(101), false)]
    #[case(format!("{}   \t", "a".repeat(100)), true)]
    #[case("é".repeat(100), true)]
    #[case("é".repeat(101), false)]
    #[case("日本".repeat(50), true)]
    #[case(format!("{}🦀", "x".repeat(99)), true)]
    #[case(format!("{}🦀🦀", "x".repeat(99)), false)]
    fn test_boundary(#[case] line: String, #[case] passes: bool) {
        let result = checker(100, &[]).check_content(&candidate(), &line);
        assert_eq!(result.is_ok(), passes, "length {}", line.chars().count());
    }

    #[test]
    fn test_line_too_long_reports_position_and_content() {
        let content = format!("fn a() {{}}\n\n\n\n{}\nfn b() {{}}\n", "x".repeat(120));

        let err = checker(100, &[]).check_content(&candidate(), &content).unwrap_err();

        match err {
            LineGuardError::LineTooLong(v) => {
                assert_eq!(v.line_number, 5);
                assert_eq!(v.length, 120);
                assert_eq!(v.content, "x".repeat(120));
                assert_eq!(v.file_path, Path::new("./src/lib.rs"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stale_exception() {
        let content = (1..=7)
            .map(|i| if i == 7 { "y".repeat(80) } else { String::new() })
            .collect::<Vec<_>>()
            .join("\n");

        let err = checker(100, &[("./src/lib.rs", 7)])
            .check_content(&candidate(), &content)
            .unwrap_err();

        assert!(matches!(&err, LineGuardError::StaleException(v) if v.line_number == 7));
        assert!(err.to_string().starts_with("line not too long: ./src/lib.rs: 7"));
    }

    #[test]
    fn test_excepted_long_line_passes() {
        let content = format!("short\n{}\n", "z".repeat(150));
        let lines = checker(100, &[("src/lib.rs", 2)])
            .check_content(&candidate(), &content)
            .unwrap();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_exception_in_other_file_does_not_apply() {
        let content = "z".repeat(150);
        let result = checker(100, &[("src/main.rs", 1)]).check_content(&candidate(), &content);
        assert!(matches!(result, Err(LineGuardError::LineTooLong(_))));
    }

    #[rstest]
    #[case("", 0)]
    #[case("a", 1)]
    #[case("a\n", 1)]
    #[case("a\nb", 2)]
    #[case("a\r\nb\r\n", 2)]
    #[case("\n\n", 2)]
    #[case("a\rb\rc\n", 3)]
    #[case("a\r", 1)]
    #[case("\r\n\r", 2)]
    #[case("a\n\rb", 3)]
    fn test_line_counting(#[case] content: &str, #[case] expected: usize) {
        assert_eq!(checker(100, &[]).check_content(&candidate(), content).unwrap(), expected);
    }

    #[test]
    fn test_carriage_returns_separate_lines() {
        let content = format!("{}\r{}\n", "x".repeat(60), "y".repeat(60));
        assert_eq!(checker(100, &[]).check_content(&candidate(), &content).unwrap(), 2);

        let content = format!("ok\r{}\r", "z".repeat(101));
        let err = checker(100, &[]).check_content(&candidate(), &content).unwrap_err();
        assert_eq!(err.violation().map(|v| v.line_number), Some(2));
    }

    #[rstest]
    #[case("ab\x1f", 2)]
    #[case("ab\x1c\x1d\x1e ", 2)]
    #[case("a\x1fb", 3)]
    #[case("ab\u{3000}", 2)]
    fn test_trailing_separators_are_stripped(#[case] line: &str, #[case] expected: usize) {
        assert_eq!(checker(100, &[]).measure(line), expected);
    }

    #[test]
    fn test_first_violation_wins() {
        let content = format!("{}\n{}\n", "a".repeat(101), "b".repeat(101));
        let err = checker(100, &[]).check_content(&candidate(), &content).unwrap_err();
        assert_eq!(err.violation().map(|v| v.line_number), Some(1));
    }

    #[test]
    fn test_scan_collects_all() {
        let content = format!("{}\nok\n{}\n", "a".repeat(101), "b".repeat(10));
        let scan = checker(100, &[("src/lib.rs", 3)]).scan_content(&candidate(), &content);

        assert_eq!(scan.lines, 3);
        let kinds: Vec<_> = scan.violations.iter().map(|v| (v.kind, v.line_number)).collect();
        assert_eq!(
            kinds,
            vec![(ViolationKind::LineTooLong, 1), (ViolationKind::StaleException, 3)]
        );
    }

    #[rstest]
    #[case(None, "\tabc", 4)]
    #[case(Some(4), "\tabc", 7)]
    #[case(Some(4), "ab\tc", 5)]
    #[case(Some(8), "\t\t", 0)]
    #[case(Some(8), "\t\tx", 17)]
    fn test_tab_width(
        #[case] tab_width: Option<usize>,
        #[case] line: &str,
        #[case] expected: usize,
    ) {
        let checker = LineChecker::new(100, tab_width, ExceptionSet::default());
        assert_eq!(checker.measure(line), expected);
    }

    #[test]
    fn test_check_file_reads_from_disk() -> LineGuardResult<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("src"))?;
        fs::write(temp_dir.path().join("src/lib.rs"), "one\ntwo\nthree\n")?;

        let file = CandidateFile::new(temp_dir.path(), "src/lib.rs");
        assert_eq!(checker(100, &[]).check_file(&file)?, 3);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_read_error() -> LineGuardResult<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("bad.rs"), [0xff, 0xfe, b'\n'])?;

        let file = CandidateFile::new(temp_dir.path(), "bad.rs");
        let result = checker(100, &[]).check_file(&file);
        assert!(matches!(result, Err(LineGuardError::Read { .. })));
        Ok(())
    }
}

//! Errors reported by the strict parsers.

use crate::grammar::MatchFailure;
use std::fmt;
use thiserror::Error;

/// What a strict parse was asked to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseTarget {
    File,
    Line,
}

impl fmt::Display for ParseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Line => f.write_str("line"),
        }
    }
}

/// Input that does not follow requirements file syntax.
///
/// The loose parsers never produce this error.
///
/// # Examples
///
/// ```
/// use pip_requirements::parse_requirements_line;
///
/// let err = parse_requirements_line("pip???").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Failed to parse requirements line. Line 1, col 4: expected end of input"
/// );
/// assert_eq!(err.position, 3);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse requirements {target}. Line {line}, col {column}: expected {expected}")]
pub struct RequirementsSyntaxError {
    /// Whether a whole file or a single line was being parsed
    pub target: ParseTarget,
    /// Byte offset of the furthest point the parser reached
    pub position: usize,
    /// 1-based line of `position`
    pub line: usize,
    /// 1-based column of `position`, in characters
    pub column: usize,
    /// What would have let parsing continue, e.g. `"," or "]"`
    pub expected: String,
}

impl RequirementsSyntaxError {
    /// Build the error for a failed match over `input`.
    pub fn from_failure(target: ParseTarget, input: &str, failure: &MatchFailure) -> Self {
        let (line, column) = failure.line_col(input);
        Self {
            target,
            position: failure.position,
            line,
            column,
            expected: failure.description(),
        }
    }
}

/// Result type alias for strict parsing.
pub type Result<T> = std::result::Result<T, RequirementsSyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Expected;

    #[test]
    fn test_error_display() {
        let err = RequirementsSyntaxError {
            target: ParseTarget::File,
            position: 12,
            line: 2,
            column: 3,
            expected: "\",\" or \"]\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse requirements file. Line 2, col 3: expected \",\" or \"]\""
        );
    }

    #[test]
    fn test_from_failure_locates_position() {
        let failure = MatchFailure {
            position: 6,
            expected: vec![Expected::Named("end of input")],
        };
        let err = RequirementsSyntaxError::from_failure(ParseTarget::File, "pip\nab!", &failure);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.expected, "end of input");
        assert_eq!(err.target.to_string(), "file");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequirementsSyntaxError>();
    }
}

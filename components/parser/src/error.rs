//! Parse error reporting.

use core_types::SourcePosition;
use std::fmt;

/// A syntax error produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable description
    pub message: String,
    /// Where the error was detected
    pub position: SourcePosition,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: SourcePosition) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }

    /// Renders the offending source line with a caret under the error
    /// column, or an empty string if the position is out of range.
    pub fn source_location_hint(&self, source: &str) -> String {
        let Some(line) = source.lines().nth(self.position.line.saturating_sub(1)) else {
            return String::new();
        };
        let caret_offset = self.position.column.saturating_sub(1);
        format!("{}\n{}^", line, " ".repeat(caret_offset.min(line.len())))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = ParseError::new("Unexpected token ')'", SourcePosition::new(2, 5));
        assert_eq!(error.to_string(), "Unexpected token ')' (line 2, column 5)");
    }

    #[test]
    fn test_source_location_hint() {
        let error = ParseError::new("oops", SourcePosition::new(2, 3));
        let hint = error.source_location_hint("first\nsecond line");
        assert_eq!(hint, "second line\n  ^");
    }

    #[test]
    fn test_hint_out_of_range() {
        let error = ParseError::new("oops", SourcePosition::new(9, 1));
        assert_eq!(error.source_location_hint("one line"), "");
    }
}

//! Error types for the CLI.

use parser::ParseError;
use std::fmt;

/// Host-tier errors of the CLI driver.
#[derive(Debug)]
pub enum CliError {
    /// File I/O error
    IoError(std::io::Error),

    /// Syntax error from the parser
    ParseError(ParseError),

    /// Line editor failure
    ReplError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError(error) => write!(f, "File error: {}", error),
            CliError::ParseError(error) => write!(f, "Parse error: {}", error),
            CliError::ReplError(message) => write!(f, "REPL error: {}", message),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::IoError(error) => Some(error),
            CliError::ParseError(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::IoError(error)
    }
}

impl From<ParseError> for CliError {
    fn from(error: ParseError) -> Self {
        CliError::ParseError(error)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

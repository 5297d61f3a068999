//! JavaScript error kinds.
//!
//! These correspond to the built-in error constructors. The runtime
//! allocates an error object of the requested kind when an exception is
//! thrown; the kind also names the constructor and prototype registered
//! on the global object.

use std::fmt;

/// The kind of a built-in JavaScript error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The base `Error` constructor
    Error,
    /// Error in `eval()` usage
    EvalError,
    /// Value outside the allowed range
    RangeError,
    /// Reference to an unresolvable binding
    ReferenceError,
    /// Invalid syntax
    SyntaxError,
    /// Operation applied to a value of the wrong type
    TypeError,
    /// Malformed URI handling
    URIError,
}

impl ErrorKind {
    /// The constructor name, as exposed on the global object and used by
    /// `Error.prototype.name`.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::EvalError => "EvalError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::URIError => "URIError",
        }
    }

    /// The error subclasses, excluding the base `Error`.
    pub fn subclasses() -> &'static [ErrorKind] {
        &[
            ErrorKind::EvalError,
            ErrorKind::RangeError,
            ErrorKind::ReferenceError,
            ErrorKind::SyntaxError,
            ErrorKind::TypeError,
            ErrorKind::URIError,
        ]
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ErrorKind::TypeError.name(), "TypeError");
        assert_eq!(ErrorKind::URIError.name(), "URIError");
        assert_eq!(ErrorKind::Error.to_string(), "Error");
    }

    #[test]
    fn test_subclasses_exclude_base() {
        assert!(!ErrorKind::subclasses().contains(&ErrorKind::Error));
        assert_eq!(ErrorKind::subclasses().len(), 6);
    }
}

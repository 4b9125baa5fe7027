//! Mock generation errors.

use displaydoc::Display;
use thiserror::Error;

/// Errors that abort a mock generation.
///
/// Both generation variants point at a mismatch between the compiled operation and its inputs,
/// so no partial payload is returned when they happen.
#[derive(Error, Debug, Display, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MockError {
    /// undefined variable `{0}`
    UndefinedVariable(String),
    /// unexpected selection kind at '{0}'
    UnexpectedSelection(String),
    /// invalid operation: {0}
    InvalidOperation(String),
}

impl MockError {
    /// A stable code identifying the error class.
    pub const fn code(&self) -> &'static str {
        match self {
            MockError::UndefinedVariable(_) => "UNDEFINED_VARIABLE",
            MockError::UnexpectedSelection(_) => "UNEXPECTED_SELECTION",
            MockError::InvalidOperation(_) => "INVALID_OPERATION",
        }
    }
}

impl From<serde_json::Error> for MockError {
    fn from(error: serde_json::Error) -> Self {
        MockError::InvalidOperation(error.to_string())
    }
}

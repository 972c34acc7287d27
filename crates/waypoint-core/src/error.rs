//! Error types for the flow library.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Comprehensive error type for all flow operations.
///
/// Errors fall into two classes, see [`FlowError::is_recoverable`]:
/// recoverable ones abandon the current operation while the flow and the
/// session keep going, the rest propagate to the outermost control loop.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Flow not found for the given ID
    #[error("Flow with ID {id} not found")]
    FlowNotFound { id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Reading from or writing to the interactive console failed
    #[error("Console error: {source}")]
    Console {
        #[from]
        source: std::io::Error,
    },
    /// The input source has no more lines to give
    #[error("Input source closed while waiting for '{prompt}'")]
    InputClosed { prompt: String },
    /// A required text value was captured empty
    #[error("Invalid input. {field} cannot be empty")]
    EmptyInput { field: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// A selection outside of the offered choices
    #[error("Invalid selection: {choice}")]
    InvalidSelection { choice: String },
    /// A calculus operand references a number input that has not run yet
    #[error("Number input at step {index} must be executed before the calculus step")]
    MissingDependency { index: usize },
    /// A step references a position that is not a usable number input
    #[error("Invalid step reference {index}: {reason}")]
    InvalidReference { index: usize, reason: String },
    /// Division with a zero divisor
    #[error("Division by zero is not possible")]
    DivisionByZero,
    /// Operation choice that maps to no known operation
    #[error("Unknown operation: {choice}")]
    UnknownOperation { choice: String },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> FlowError {
        FlowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl FlowError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a file system error for `path`.
    pub fn file_system(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        FlowError::FileSystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error only abandons the current operation.
    ///
    /// Domain errors (division by zero, missing calculus dependencies,
    /// unknown operations or selections) and resource errors (files that
    /// cannot be opened) are reported and the enclosing flow continues.
    /// Everything else, notably an empty required text value or a closed
    /// input source, propagates out of the step.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FlowError::FileSystem { .. }
                | FlowError::InvalidSelection { .. }
                | FlowError::MissingDependency { .. }
                | FlowError::InvalidReference { .. }
                | FlowError::DivisionByZero
                | FlowError::UnknownOperation { .. }
                | FlowError::FlowNotFound { .. }
        )
    }
}

/// Extension trait for Result to attach context while converting to
/// FlowError.
pub trait ResultExt<T> {
    /// Map an I/O error to a file system error at `path`.
    fn fs_context(self, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| FlowError::file_system(path, e))
    }
}

/// Result type alias for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(FlowError::DivisionByZero.is_recoverable());
        assert!(FlowError::MissingDependency { index: 0 }.is_recoverable());
        assert!(FlowError::file_system(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone")
        )
        .is_recoverable());

        assert!(!FlowError::EmptyInput {
            field: "Text input".to_string()
        }
        .is_recoverable());
        assert!(!FlowError::InputClosed {
            prompt: "TITLE: ".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = FlowError::invalid_input("name").with_reason("must not be blank");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'name': must not be blank"
        );
    }

    #[test]
    fn test_fs_context_keeps_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.fs_context(Path::new("/tmp/out.txt")).unwrap_err();
        match err {
            FlowError::FileSystem { path, .. } => assert_eq!(path, PathBuf::from("/tmp/out.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

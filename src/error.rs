//! Error types for the pyvba translator

use thiserror::Error;

/// Main error type for pyvba
///
/// A `line` of 0 means the location is unknown.
#[derive(Debug, Error)]
pub enum PyVbaError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Cannot find handler associated with {node} at line {line}")]
    NoHandler { node: String, line: usize },

    #[error("Unsupported construct at line {line}: {construct}")]
    UnsupportedConstruct { construct: String, line: usize },

    #[error("Unknown type '{name}' at line {line}")]
    UnknownType { name: String, line: usize },

    #[error("Invalid annotation at line {line}: {message}")]
    InvalidAnnotation { message: String, line: usize },

    #[error("Procedure '{name}' not found in module '{module}'")]
    MissingProcedure { name: String, module: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PyVbaError {
    pub fn unsupported(construct: impl Into<String>, line: usize) -> Self {
        PyVbaError::UnsupportedConstruct {
            construct: construct.into(),
            line,
        }
    }

    /// Source line of the error, 0 when unknown
    pub fn line(&self) -> usize {
        match self {
            PyVbaError::ParseError { line, .. }
            | PyVbaError::NoHandler { line, .. }
            | PyVbaError::UnsupportedConstruct { line, .. }
            | PyVbaError::UnknownType { line, .. }
            | PyVbaError::InvalidAnnotation { line, .. } => *line,
            PyVbaError::MissingProcedure { .. } | PyVbaError::IoError(_) => 0,
        }
    }

    /// Fill in the source line when the error was raised without one.
    pub fn at_line(mut self, at: usize) -> Self {
        match &mut self {
            PyVbaError::ParseError { line, .. }
            | PyVbaError::NoHandler { line, .. }
            | PyVbaError::UnsupportedConstruct { line, .. }
            | PyVbaError::UnknownType { line, .. }
            | PyVbaError::InvalidAnnotation { line, .. } => {
                if *line == 0 {
                    *line = at;
                }
            }
            PyVbaError::MissingProcedure { .. } | PyVbaError::IoError(_) => {}
        }
        self
    }
}

pub type Result<T> = std::result::Result<T, PyVbaError>;

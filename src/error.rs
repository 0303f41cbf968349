//! Error types for loading, normalizing and linking operations.
//!
//! This module defines a structured error hierarchy that provides detailed
//! information about parsing failures, including line/column positions and
//! format-specific context, plus the pipeline-level errors that wrap them.

use crate::DataFormat;
use crate::pipeline::TaskId;
use std::path::PathBuf;
use thiserror::Error;

/// Field name constants for consistent error reporting.
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DATE: &str = "date";
    pub const JOURNAL: &str = "journal";
    pub const DRUG: &str = "drug";
    pub const ATCCODE: &str = "atccode";
}

/// Top-level error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Task {task} failed after {attempts} attempt(s): {source}")]
    TaskFailed {
        task: TaskId,
        attempts: u32,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Parse error with detailed location and context information.
#[derive(Error, Debug)]
#[error("Error in {format} format{}: {error}",
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {} column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        (None, Some(c)) => format!(" at column {}", c),
        (None, None) => String::new(),
    }
)]
pub struct ParseError {
    /// Line number where the error occurred (1-based, None if not available)
    pub line: Option<usize>,
    /// Column number where the error occurred (1-based, None if not available)
    pub column: Option<usize>,
    /// The data format being parsed
    pub format: DataFormat,
    /// The specific error that occurred
    pub error: ValueError,
}

impl ParseError {
    /// Create a new ParseError.
    pub fn new(
        line: Option<usize>,
        column: Option<usize>,
        format: DataFormat,
        error: ValueError,
    ) -> Self {
        Self {
            line,
            column,
            format,
            error,
        }
    }

    /// Create a ParseError with just line information.
    pub fn at_line(line: usize, format: DataFormat, error: ValueError) -> Self {
        Self::new(Some(line), None, format, error)
    }

    /// Create a ParseError with line and column information.
    pub fn at_position(line: usize, column: usize, format: DataFormat, error: ValueError) -> Self {
        Self::new(Some(line), Some(column), format, error)
    }

    /// Create a ParseError without position information.
    pub fn without_position(format: DataFormat, error: ValueError) -> Self {
        Self::new(None, None, format, error)
    }
}

/// Specific value-level errors that can occur during loading and conversion.
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("Bad syntax: {0}")]
    Syntax(String),

    #[error("Missing value for {key}")]
    MissingValue {
        field: &'static str,
        key: String,
    },

    #[error("Missing column for {field}")]
    MissingColumn { field: &'static str },

    #[error("Bad value for {key}: \"{value}\" ({reason})")]
    BadValue {
        field: &'static str,
        key: String,
        value: String,
        reason: String,
    },
}

// Conversion implementations for external error types

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|position| position.line() as usize);
        ParseError::new(line, None, DataFormat::Csv, ValueError::Syntax(err.to_string()))
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json reports 0 for errors without a position, e.g. EOF on empty input
        let line = Some(err.line()).filter(|&l| l > 0);
        let column = Some(err.column()).filter(|&c| c > 0);
        ParseError::new(line, column, DataFormat::Json, ValueError::Syntax(err.to_string()))
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let (line, column) = match err.location() {
            Some(location) => (Some(location.line()), Some(location.column())),
            None => (None, None),
        };
        ParseError::new(line, column, DataFormat::Yaml, ValueError::Syntax(err.to_string()))
    }
}

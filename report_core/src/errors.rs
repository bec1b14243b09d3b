//! # Error Types
//!
//! Structured error types for report_core. A run can fail in three places:
//! reading the input table ([`LoadError`]), reading the configuration
//! ([`ConfigError`]) or producing the output artifact ([`RenderError`]).
//! [`ReportError`] wraps all three for the pipeline entry points.
//!
//! ## Example
//!
//! ```rust
//! use report_core::errors::{LoadError, ReportError};
//!
//! let err: ReportError = LoadError::source_not_found("data/Force.xlsx").into();
//! assert_eq!(err.error_code(), "SOURCE_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Failure to turn a tabular source into a dataset.
///
/// Any of these aborts the run before a document is assembled.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LoadError {
    /// The input path does not exist
    #[error("Data source not found: '{path}'")]
    SourceNotFound { path: String },

    /// The file exists but could not be opened or parsed
    #[error("Cannot read data source '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    /// No reader is registered for the file extension
    #[error("Unsupported data source format '{extension}' for '{path}'")]
    UnsupportedFormat { path: String, extension: String },

    /// A required column could not be mapped to any header
    #[error("Missing required column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A cell in a mapped column is not a finite number
    #[error("Invalid value in row {row}, column '{column}': '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// The source has a header but no data rows
    #[error("Data source '{source_name}' contains no data rows")]
    Empty { source_name: String },
}

impl LoadError {
    /// Create a SourceNotFound error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        LoadError::SourceNotFound { path: path.into() }
    }

    /// Create an Unreadable error
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::Unreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingColumn error
    pub fn missing_column(column: impl Into<String>, available: &[String]) -> Self {
        LoadError::MissingColumn {
            column: column.into(),
            available: available.to_vec(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        LoadError::InvalidValue {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an Empty error
    pub fn empty(source_name: impl Into<String>) -> Self {
        LoadError::Empty {
            source_name: source_name.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LoadError::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            LoadError::Unreadable { .. } => "SOURCE_UNREADABLE",
            LoadError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            LoadError::MissingColumn { .. } => "MISSING_COLUMN",
            LoadError::InvalidValue { .. } => "INVALID_VALUE",
            LoadError::Empty { .. } => "EMPTY_DATASET",
        }
    }
}

/// Failure to produce the output artifact.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum RenderError {
    /// Typst rejected the generated markup
    #[error("Typst compilation failed: {}", .diagnostics.join("; "))]
    Compile {
        diagnostics: Vec<String>,
        /// Markup kept on disk for inspection, if any
        source_path: Option<String>,
    },

    /// The compiled document could not be exported
    #[error("PDF export failed: {reason}")]
    Export { reason: String },

    /// Writing an artifact failed
    #[error("File error: {operation} on '{path}' - {reason}")]
    Io {
        operation: String,
        path: String,
        reason: String,
    },

    /// The document tree could not be serialized
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl RenderError {
    /// Create an Io error
    pub fn io(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        RenderError::Io {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Path of the retained intermediate markup, when compilation failed after writing it
    pub fn retained_source(&self) -> Option<&str> {
        match self {
            RenderError::Compile { source_path, .. } => source_path.as_deref(),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            RenderError::Compile { .. } => "COMPILE_FAILED",
            RenderError::Export { .. } => "EXPORT_FAILED",
            RenderError::Io { .. } => "FILE_ERROR",
            RenderError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }
}

/// Failure to read a configuration file.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    #[error("Cannot read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config '{path}': {reason}")]
    Parse { path: String, reason: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_UNREADABLE",
            ConfigError::Parse { .. } => "CONFIG_INVALID",
        }
    }
}

/// Any failure of a report run.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "stage", content = "error")]
pub enum ReportError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ReportError {
    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ReportError::Load(e) => e.error_code(),
            ReportError::Render(e) => e.error_code(),
            ReportError::Config(e) => e.error_code(),
        }
    }
}

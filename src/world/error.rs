//! Error types for world data loading.

use thiserror::Error;

/// Errors that can occur when loading scene definitions.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Two scenes share a name.
    #[error("Scene '{0}' is defined more than once")]
    DuplicateScene(String),

    /// A scene uses a reserved name.
    #[error("Scene name '{0}' is reserved")]
    ReservedName(String),
}

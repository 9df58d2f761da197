//! Error types for catalogue conversion.

use std::path::PathBuf;

/// Result type for conversion operations.
pub type JsonResult<T> = Result<T, JsonError>;

/// Errors that can occur while loading or saving a catalogue.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// Failed to read catalogue file.
    #[error("Failed to read file {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    /// Failed to write catalogue file.
    #[error("Failed to write file {path}: {message}")]
    WriteError { path: PathBuf, message: String },

    /// Malformed JSON or a field of the wrong shape.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A parameter names a module that no route mentions.
    #[error("Parameter given for unlisted module '{module}' in process '{process}'")]
    UnknownModule { process: String, module: String },

    /// A product lists a process identifier that no process carries.
    #[error("Unknown process uuid '{uuid}' in product '{product}'")]
    UnknownProcess { product: String, uuid: String },

    /// An integer field holds something other than an integer.
    #[error("Expected an integer for key {key} but got {value}")]
    InvalidInteger { key: &'static str, value: String },
}

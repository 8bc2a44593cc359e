// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Missing front matter separator in {path}")]
    MissingSeparator { path: PathBuf },

    #[error("Invalid attributes in {path}: {message}")]
    InvalidAttributes { path: PathBuf, message: String },

    #[error("Conversion failed for {path}: {message}")]
    Conversion { path: PathBuf, message: String },

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

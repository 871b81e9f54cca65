//! Error types for the mathdoc library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Errors that abort a render run.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read Markdown source {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write HTML output {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that abort a packaging run.
///
/// Missing or uncopyable images are not errors; they are reported in
/// [`PackageReport`](crate::package::PackageReport) instead.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to read HTML source {}: {source}", path.display())]
    ReadHtml {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write standalone HTML {}: {source}", path.display())]
    WriteHtml {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write archive {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },
}

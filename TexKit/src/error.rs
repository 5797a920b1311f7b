//! Error types for `TexKit`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `TexKit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path.
    #[error("{action} {path}: {source}")]
    PathIo {
        /// What was being attempted ("reading", "listing", ...).
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A temp file could not be moved over its destination.
    #[error("failed to replace {path}: {message}")]
    Persist {
        /// The destination that was not replaced.
        path: PathBuf,
        /// The error message.
        message: String,
    },

    // ==================== Parsing / Serialization Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration file is present but unusable.
    #[error("invalid config {path}: {message}")]
    Config {
        /// The config file path.
        path: PathBuf,
        /// The error message.
        message: String,
    },

    // ==================== Image Errors ====================
    /// Image decode or encode failed.
    #[error("image error for {path}: {source}")]
    Image {
        /// The image being processed.
        path: PathBuf,
        /// The underlying image error.
        #[source]
        source: image::ImageError,
    },

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A file or directory name is not valid UTF-8.
    #[error("name is not valid UTF-8: {}", .0.display())]
    NonUtf8Name(PathBuf),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// A rename plan would collide with itself or with existing entries.
    #[error("rename would create duplicate paths: {}", .0.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    RenameConflict(Vec<PathBuf>),
}

impl Error {
    /// Wrap an IO error with the path it concerns.
    pub(crate) fn path_io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::PathIo {
            action,
            path: path.into(),
            source,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `TexKit` operations.
pub type Result<T> = std::result::Result<T, Error>;

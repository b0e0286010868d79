//! Error types shared across tgsrender crates.

use std::path::PathBuf;

/// Top-level error type for tgsrender operations.
#[derive(Debug, thiserror::Error)]
pub enum TgsError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Decompression error: {message}")]
    Decompress { message: String },

    #[error("Invalid animation: {message}")]
    InvalidAnimation { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TgsError.
pub type TgsResult<T> = Result<T, TgsError>;

impl TgsError {
    pub fn decompress(msg: impl Into<String>) -> Self {
        Self::Decompress {
            message: msg.into(),
        }
    }

    pub fn invalid_animation(msg: impl Into<String>) -> Self {
        Self::InvalidAnimation {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Map an I/O error on `path` to `FileNotFound` when the file is missing.
    pub fn from_io_at(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }
}

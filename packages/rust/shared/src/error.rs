//! Error types for gradio-md.
//!
//! Library crates use [`GradioMdError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for reporting.

use std::path::PathBuf;

/// Top-level error type for all gradio-md operations.
#[derive(Debug, thiserror::Error)]
pub enum GradioMdError {
    /// Malformed command-line invocation.
    #[error("usage error: {message}")]
    Usage { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Repository metadata or file listing could not produce any work.
    #[error("discovery error: {message}")]
    Discovery { message: String },

    /// Connection failure, non-2xx status, or redirect loop.
    #[error("network error: {0}")]
    Network(String),

    /// Provider response could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A fetch worker task panicked or was cancelled.
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GradioMdError>;

impl GradioMdError {
    /// Create a usage error from any displayable message.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a discovery error from any displayable message.
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

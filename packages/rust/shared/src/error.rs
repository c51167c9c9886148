//! Error types for mdnotes.
//!
//! Library crates use [`MdNotesError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mdnotes operations.
#[derive(Debug, thiserror::Error)]
pub enum MdNotesError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Fetch failure or non-2xx response.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed directory listing or host-API payload.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The external Markdown renderer failed.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad URL, unsupported value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A condition shown to the reader as rendered error content.
    #[error("{message}")]
    UserFacing { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MdNotesError>;

impl MdNotesError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an error whose message is meant to be shown on the page.
    pub fn user_facing(msg: impl Into<String>) -> Self {
        Self::UserFacing {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = MdNotesError::config("bad base_url");
        assert_eq!(err.to_string(), "config error: bad base_url");

        let err = MdNotesError::Network("docs/: HTTP 404 Not Found".into());
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn user_facing_message_is_bare() {
        let err = MdNotesError::user_facing("No file specified in URL.");
        assert_eq!(err.to_string(), "No file specified in URL.");
    }
}

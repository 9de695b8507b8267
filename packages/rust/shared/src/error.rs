//! Error types for the FT API client.
//!
//! Library crates use [`FtApiError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all FT API client operations.
#[derive(Debug, thiserror::Error)]
pub enum FtApiError {
    /// A required argument was missing or empty (e.g. the API key).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Connection-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("HTTP {status} for {path}")]
    Http { path: String, status: u16 },

    /// The response body could not be decoded as JSON.
    #[error("decode error for {path}: {message}")]
    Decode { path: String, message: String },

    /// No async runtime was available to run a request on.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Configuration file loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FtApiError>;

impl FtApiError {
    /// Create an invalid-argument error from any displayable message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

    /// Whether this error came back from a dispatched request rather than
    /// from local setup.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Http { .. } | Self::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = FtApiError::invalid_argument("an API key is required");
        assert_eq!(err.to_string(), "invalid argument: an API key is required");

        let err = FtApiError::Http {
            path: "http://api.ft.com/site/v1/pages/".into(),
            status: 403,
        };
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[test]
    fn request_failures_are_classified() {
        assert!(FtApiError::Transport("reset".into()).is_request_failure());
        assert!(
            FtApiError::Decode {
                path: "p".into(),
                message: "eof".into()
            }
            .is_request_failure()
        );
        assert!(!FtApiError::config("bad toml").is_request_failure());
        assert!(!FtApiError::Runtime("none".into()).is_request_failure());
        assert!(!FtApiError::invalid_argument("no key").is_request_failure());
    }
}

//! Unified error type for mediaconv.
//!
//! Every failure mode is terminal for the process: the binary prints a single
//! human-readable diagnostic on stderr and exits nonzero. There is no retry
//! and no partial-success status finer than the progress log.

use std::path::PathBuf;

/// Errors that can occur while resolving and running a conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required CLI flag is missing.
    #[error("usage error: {0}")]
    Usage(String),

    /// The requested format token is not in the resolution table.
    #[error("unsupported format: {format}")]
    UnsupportedFormat {
        /// The format token as the caller supplied it.
        format: String,
    },

    /// The source path does not exist.
    #[error("input file does not exist: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The engine reported the conversion infeasible after plan initialization.
    #[error("conversion is not valid for the given file and format: {0}")]
    InvalidConversion(String),

    /// An external tool (ffmpeg, ffprobe) failed.
    #[error("tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Media probing failed.
    #[error("probe error: {0}")]
    Probe(String),

    /// An I/O operation failed.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::Usage`].
    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    /// Convenience constructor for [`Error::UnsupportedFormat`].
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Error::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Convenience constructor for [`Error::InputNotFound`].
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Error::InputNotFound { path: path.into() }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_display() {
        let err = Error::usage("--input is required");
        assert_eq!(err.to_string(), "usage error: --input is required");
    }

    #[test]
    fn unsupported_format_display() {
        let err = Error::unsupported_format("xyz");
        assert_eq!(err.to_string(), "unsupported format: xyz");
    }

    #[test]
    fn input_not_found_display() {
        let err = Error::input_not_found("/tmp/missing.mkv");
        assert_eq!(err.to_string(), "input file does not exist: /tmp/missing.mkv");
    }

    #[test]
    fn invalid_conversion_display() {
        let err = Error::InvalidConversion("source has no audio stream".into());
        assert!(err.to_string().contains("no audio stream"));
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "exited with status 1");
        assert_eq!(err.to_string(), "tool error [ffmpeg]: exited with status 1");
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
    }
}

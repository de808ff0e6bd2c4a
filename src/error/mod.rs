//! Error types for splitrs.

use std::fmt;

/// Errors that can occur while splitting a byte stream into records.
#[derive(Debug)]
pub enum SplitError {
    /// An I/O error occurred while reading a streaming input.
    Io(std::io::Error),

    /// A chunk source could not deliver the bytes a scan asked for.
    ///
    /// Also raised when a source yields more or fewer bytes than its declared
    /// length.
    SourceRead {
        /// Input offset at which the read was attempted.
        offset: u64,
        /// The underlying failure.
        source: std::io::Error,
    },

    /// A cursor was requested past the end of the input.
    OutOfBounds {
        /// The requested offset.
        offset: u64,
        /// The input length.
        len: u64,
    },

    /// Invalid argument or configuration parameter.
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The split was cancelled before every range finished.
    Cancelled,
}

impl SplitError {
    /// Builds a [`SplitError::SourceRead`] for a source whose byte count does
    /// not match its declared length.
    pub(crate) fn length_mismatch(offset: u64, message: &'static str) -> Self {
        SplitError::SourceRead {
            offset,
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, message),
        }
    }
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::Io(e) => write!(f, "io error: {}", e),
            SplitError::SourceRead { offset, source } => {
                write!(f, "source read failed at offset {}: {}", offset, source)
            }
            SplitError::OutOfBounds { offset, len } => {
                write!(f, "offset {} is past the end of the input ({} bytes)", offset, len)
            }
            SplitError::InvalidArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            SplitError::Cancelled => write!(f, "split cancelled"),
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::Io(e) => Some(e),
            SplitError::SourceRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SplitError {
    fn from(e: std::io::Error) -> Self {
        SplitError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: SplitError = io_err.into();
        assert!(matches!(err, SplitError::Io(_)));
    }

    #[test]
    fn test_display() {
        let err = SplitError::OutOfBounds { offset: 12, len: 10 };
        assert!(err.to_string().contains("past the end"));

        let err = SplitError::InvalidArgument {
            message: "delimiter must not be empty",
        };
        assert_eq!(err.to_string(), "invalid argument: delimiter must not be empty");
    }

    #[test]
    fn test_source_read_exposes_cause() {
        let err = SplitError::length_mismatch(7, "source ended early");
        assert!(err.to_string().contains("offset 7"));
        assert!(err.source().is_some());
    }
}

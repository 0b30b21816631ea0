//! Error types for bytepipe.

use thiserror::Error;

/// Errors that can occur while building or draining a [`Pipe`](crate::Pipe).
///
/// Every failure is I/O-kind: opening, reading, writing or flushing a source
/// or sink, or an error returned by a caller-supplied transform, splitter or
/// converter. The one extra variant reports misuse of a pipe whose source has
/// already been consumed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipeError {
    /// An I/O error occurred on a source, a sink, or inside a caller-supplied function.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The pipe's source was already drained by an earlier terminal operation.
    #[error("pipe source already drained")]
    Drained,
}

impl PipeError {
    /// Returns the underlying I/O error kind, if this is an I/O failure.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            PipeError::Io(e) => Some(e.kind()),
            PipeError::Drained => None,
        }
    }

    /// Returns true if the pipe had already been drained.
    pub fn is_drained(&self) -> bool {
        matches!(self, PipeError::Drained)
    }
}

/// A specialized `Result` for pipe operations.
pub type Result<T> = std::result::Result<T, PipeError>;

/// Lets pipe operations be used with `?` inside caller-supplied
/// `io::Result` functions.
impl From<PipeError> for std::io::Error {
    fn from(value: PipeError) -> Self {
        match value {
            PipeError::Io(e) => e,
            PipeError::Drained => Self::other(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(ErrorKind::NotFound, "test");
        let err: PipeError = io_err.into();
        assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
        assert!(!err.is_drained());
    }

    #[test]
    fn test_display() {
        let err = PipeError::Drained;
        assert!(err.to_string().contains("already drained"));
        assert!(err.is_drained());
        assert_eq!(err.io_kind(), None);
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err = PipeError::Io(std::io::Error::new(ErrorKind::BrokenPipe, "gone"));
        let io: std::io::Error = err.into();
        assert_eq!(io.kind(), ErrorKind::BrokenPipe);

        let io: std::io::Error = PipeError::Drained.into();
        assert_eq!(io.kind(), ErrorKind::Other);
        assert!(io.to_string().contains("already drained"));
    }
}

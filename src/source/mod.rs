//! The byte source attached to a pipe.
//!
//! A pipe owns exactly one [`Source`] at a time. Consuming it (draining,
//! transforming, splitting) moves it out and leaves [`Source::Drained`]
//! behind, so the old source is released on every exit path, including a
//! failure halfway through a copy.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bytes::Bytes;

use crate::buffer;
use crate::error::{PipeError, Result};

#[cfg(feature = "http")]
use crate::config::HttpConfig;

pub(crate) enum Source {
    /// Bytes already in memory: constructed buffers and strings, and the
    /// output of every transform.
    Memory(Bytes),

    /// An open reader: files, URLs and caller-supplied streams.
    Stream(Box<dyn Read + Send>),

    /// Consumed by a terminal operation.
    Drained,
}

impl Source {
    pub(crate) fn file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "opened file source");
        Ok(Source::Stream(Box::new(file)))
    }

    #[cfg(feature = "http")]
    pub(crate) fn url(url: &str, config: &HttpConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(http_error)?;

        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;

        tracing::debug!(url, status = response.status().as_u16(), "opened url source");
        Ok(Source::Stream(Box::new(response)))
    }

    pub(crate) fn is_drained(&self) -> bool {
        matches!(self, Source::Drained)
    }

    /// Moves the source out, leaving `Drained` in its place.
    pub(crate) fn take(&mut self) -> Result<Source> {
        match std::mem::replace(self, Source::Drained) {
            Source::Drained => Err(PipeError::Drained),
            source => Ok(source),
        }
    }

    /// Reads everything that is left into memory and releases the source.
    pub(crate) fn into_bytes(self) -> Result<Bytes> {
        match self {
            Source::Memory(bytes) => Ok(bytes),
            Source::Stream(mut reader) => Ok(Bytes::from(buffer::read_all(&mut reader)?)),
            Source::Drained => Err(PipeError::Drained),
        }
    }

    /// Copies everything that is left into `out` and releases the source.
    pub(crate) fn copy_to<W: Write + ?Sized>(self, out: &mut W) -> Result<u64> {
        let copied = match self {
            Source::Memory(bytes) => buffer::copy(&mut &bytes[..], out)?,
            Source::Stream(mut reader) => buffer::copy(&mut reader, out)?,
            Source::Drained => return Err(PipeError::Drained),
        };
        Ok(copied)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            Source::Stream(_) => f.write_str("Stream"),
            Source::Drained => f.write_str("Drained"),
        }
    }
}

#[cfg(feature = "http")]
fn http_error(e: reqwest::Error) -> PipeError {
    let kind = if e.is_timeout() {
        std::io::ErrorKind::TimedOut
    } else {
        std::io::ErrorKind::Other
    };
    PipeError::Io(std::io::Error::new(kind, e))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_take_leaves_drained() {
        let mut source = Source::Memory(Bytes::from_static(b"abc"));
        let taken = source.take().unwrap();
        assert!(source.is_drained());
        assert!(!taken.is_drained());
        assert!(matches!(source.take(), Err(PipeError::Drained)));
    }

    #[test]
    fn test_memory_into_bytes_is_zero_copy() {
        let data = Bytes::from_static(b"shared");
        let out = Source::Memory(data.clone()).into_bytes().unwrap();
        assert_eq!(out.as_ptr(), data.as_ptr());
    }

    #[test]
    fn test_stream_into_bytes() {
        let source = Source::Stream(Box::new(Cursor::new(b"streamed".to_vec())));
        assert_eq!(source.into_bytes().unwrap(), Bytes::from_static(b"streamed"));
    }

    #[test]
    fn test_copy_to() {
        let mut out = Vec::new();
        let n = Source::Memory(Bytes::from_static(b"copy me"))
            .copy_to(&mut out)
            .unwrap();
        assert_eq!(n, 7);
        assert_eq!(out, b"copy me");
    }

    #[test]
    fn test_drained_operations_fail() {
        assert!(matches!(Source::Drained.into_bytes(), Err(PipeError::Drained)));
        assert!(matches!(
            Source::Drained.copy_to(&mut Vec::new()),
            Err(PipeError::Drained)
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::file(&dir.path().join("missing.bin")).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_debug() {
        assert_eq!(
            format!("{:?}", Source::Memory(Bytes::from_static(b"ab"))),
            "Memory(2 bytes)"
        );
        assert_eq!(format!("{:?}", Source::Drained), "Drained");
    }
}

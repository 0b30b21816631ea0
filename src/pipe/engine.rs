//! Core pipe engine - construction, transforms, splits and drains.
//!
//! A [`Pipe`] owns one byte source and a [`Metadata`] map. Transform and
//! split steps take the pipe by value and hand back new values; terminal
//! steps borrow it mutably and leave it drained.
//!
//! # Example
//!
//! ```
//! use bytepipe::Pipe;
//!
//! let text = Pipe::from_text("hello")
//!     .through(|bytes| Ok(bytes.to_ascii_uppercase()))?
//!     .to_text()?;
//!
//! assert_eq!(text, "HELLO");
//! # Ok::<(), bytepipe::PipeError>(())
//! ```

use std::any::Any;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use bytes::Bytes;

use super::split::Split;
use crate::config::DrainConfig;
use crate::error::{PipeError, Result};
use crate::metadata::Metadata;
use crate::source::Source;

#[cfg(feature = "http")]
use crate::config::HttpConfig;

/// A single-use byte pipe.
///
/// `Pipe` wraps exactly one active byte source plus caller-attached
/// metadata. Build one from a buffer, string, file, reader or URL; route it
/// [`through`](Pipe::through) whole-buffer transforms or
/// [`split`](Pipe::split) it into child pipes; finish with a drain such as
/// [`to_writer`](Pipe::to_writer), [`to_file`](Pipe::to_file),
/// [`to_bytes`](Pipe::to_bytes) or [`to_text`](Pipe::to_text).
///
/// # Lifecycle
///
/// Every drain consumes the source, whether it succeeds or fails. Any
/// operation on a drained pipe returns [`PipeError::Drained`].
///
/// A pipe is not meant to be shared between threads; it can be moved.
///
/// # Example
///
/// ```
/// use bytepipe::{Pipe, PipeError};
///
/// let mut pipe = Pipe::from_bytes(&b"once"[..]);
/// assert_eq!(pipe.to_bytes()?, &b"once"[..]);
/// assert!(matches!(pipe.to_bytes(), Err(PipeError::Drained)));
/// # Ok::<(), PipeError>(())
/// ```
pub struct Pipe {
    source: Source,
    metadata: Metadata,
}

impl Pipe {
    fn new(source: Source, metadata: Metadata) -> Self {
        Self { source, metadata }
    }

    /// Creates a pipe over an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::new(Source::Memory(bytes.into()), Metadata::new())
    }

    /// Creates a pipe over the UTF-8 bytes of a string.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_bytes(Bytes::from(text.into()))
    }

    /// Creates a pipe that reads the file at `path`.
    ///
    /// The file is opened immediately; a missing or unreadable file is
    /// reported here, not at drain time.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bytepipe::Pipe;
    ///
    /// let config = Pipe::from_file("Cargo.toml")?.to_text()?;
    /// println!("{}", config);
    /// # Ok::<(), bytepipe::PipeError>(())
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Source::file(path.as_ref())?, Metadata::new()))
    }

    /// Creates a pipe over any reader.
    ///
    /// The reader is dropped when the pipe is drained or dropped.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self::new(Source::Stream(Box::new(reader)), Metadata::new())
    }

    /// Creates a pipe over the body of an HTTP GET to `url`, with default
    /// request settings.
    ///
    /// Requires the `http` feature.
    #[cfg(feature = "http")]
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_url_with(url, &HttpConfig::default())
    }

    /// Creates a pipe over the body of an HTTP GET to `url`.
    ///
    /// Connection failures, timeouts and non-success statuses are reported
    /// as [`PipeError::Io`]. Requires the `http` feature.
    #[cfg(feature = "http")]
    pub fn from_url_with(url: &str, config: &HttpConfig) -> Result<Self> {
        Ok(Self::new(Source::url(url, config)?, Metadata::new()))
    }

    /// Attaches a metadata entry and returns the pipe.
    pub fn with<V>(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        self.metadata.insert(key, value);
        self
    }

    /// Attaches a metadata entry, returning true if `key` was already set.
    pub fn insert<V>(&mut self, key: impl Into<String>, value: V) -> bool
    where
        V: Any + Send + Sync,
    {
        self.metadata.insert(key, value)
    }

    /// Returns the metadata value for `key` if it is present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.metadata.get(key)
    }

    /// Returns true if a metadata entry exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.metadata.contains(key)
    }

    /// Returns the pipe's metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the pipe's metadata for modification.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Returns true once a terminal operation has consumed the source.
    pub fn is_drained(&self) -> bool {
        self.source.is_drained()
    }

    /// Replaces the content with the output of `processor`.
    ///
    /// The whole remaining source is read into memory and released, then
    /// handed to `processor`. In-memory content is passed without copying.
    /// Metadata is kept. An error from `processor` is returned as
    /// [`PipeError::Io`].
    ///
    /// # Example
    ///
    /// ```
    /// use bytepipe::Pipe;
    ///
    /// let reversed = Pipe::from_text("abc")
    ///     .through(|bytes| Ok(bytes.iter().rev().copied().collect::<Vec<u8>>()))?
    ///     .to_text()?;
    /// assert_eq!(reversed, "cba");
    /// # Ok::<(), bytepipe::PipeError>(())
    /// ```
    pub fn through<F, B>(mut self, processor: F) -> Result<Pipe>
    where
        F: FnOnce(Bytes) -> io::Result<B>,
        B: Into<Bytes>,
    {
        let input = self.source.take()?.into_bytes()?;
        let input_len = input.len();
        let output = processor(input)?.into();
        tracing::debug!(input = input_len, output = output.len(), "applied transform");

        Ok(Self::new(Source::Memory(output), self.metadata))
    }

    /// Splits the content into child pipes.
    ///
    /// The whole remaining source is read into memory and released, then
    /// handed to `processor`, which returns the children in order as
    /// anything convertible into a pipe: byte buffers, strings, or pipes.
    /// The returned iterator yields them lazily in the same order, each
    /// with this pipe's metadata filled in for keys the child does not set.
    ///
    /// # Example
    ///
    /// ```
    /// use bytepipe::Pipe;
    ///
    /// let parts = Pipe::from_text("a,b,c")
    ///     .split(|bytes| Ok(bytes.split(|b| *b == b',').map(|p| p.to_vec()).collect::<Vec<_>>()))?
    ///     .map(|mut p| p.to_text())
    ///     .collect::<Result<Vec<_>, _>>()?;
    ///
    /// assert_eq!(parts, ["a", "b", "c"]);
    /// # Ok::<(), bytepipe::PipeError>(())
    /// ```
    pub fn split<F, I>(mut self, processor: F) -> Result<Split<I::IntoIter>>
    where
        F: FnOnce(Bytes) -> io::Result<I>,
        I: IntoIterator,
        I::Item: Into<Pipe>,
    {
        let input = self.source.take()?.into_bytes()?;
        tracing::debug!(input = input.len(), "splitting pipe");
        let children = processor(input)?;

        Ok(Split::new(children.into_iter(), self.metadata))
    }

    /// Splits the content into child pipes, handing `processor` the whole
    /// pipe instead of its raw bytes.
    ///
    /// The pipe given to `processor` is backed by memory and carries this
    /// pipe's metadata. Children are yielded as for [`split`](Pipe::split).
    pub fn split_pipe<F, I>(mut self, processor: F) -> Result<Split<I::IntoIter>>
    where
        F: FnOnce(Pipe) -> io::Result<I>,
        I: IntoIterator,
        I::Item: Into<Pipe>,
    {
        let input = self.source.take()?.into_bytes()?;
        tracing::debug!(input = input.len(), "splitting whole pipe");
        let parent = self.metadata.clone();
        let children = processor(Self::new(Source::Memory(input), self.metadata))?;

        Ok(Split::new(children.into_iter(), parent))
    }

    /// Copies the remaining content into `out`, then flushes and closes it.
    ///
    /// Returns the number of bytes copied.
    pub fn to_writer<W: Write>(&mut self, out: W) -> Result<u64> {
        self.to_writer_with(out, DrainConfig::close())
    }

    /// Copies the remaining content into `out`.
    ///
    /// Bytes move through a fixed 8 KiB buffer. The source is released
    /// afterwards. With [`DrainConfig::close`] the sink is flushed and
    /// dropped; with [`DrainConfig::keep_open`] it is left as is, so pass
    /// `&mut sink` to keep writing to it.
    ///
    /// # Example
    ///
    /// ```
    /// use bytepipe::{DrainConfig, Pipe};
    ///
    /// let mut log = Vec::new();
    /// Pipe::from_text("first\n").to_writer_with(&mut log, DrainConfig::keep_open())?;
    /// Pipe::from_text("second\n").to_writer_with(&mut log, DrainConfig::keep_open())?;
    /// assert_eq!(log, b"first\nsecond\n");
    /// # Ok::<(), bytepipe::PipeError>(())
    /// ```
    pub fn to_writer_with<W: Write>(&mut self, mut out: W, config: DrainConfig) -> Result<u64> {
        let copied = self.source.take()?.copy_to(&mut out)?;
        if config.close {
            out.flush()?;
            drop(out);
        }
        tracing::debug!(bytes = copied, close = config.close, "drained pipe to writer");
        Ok(copied)
    }

    /// Writes the remaining content to a fresh file at `path`, creating or
    /// truncating it. The file is closed afterwards.
    ///
    /// Returns the number of bytes written.
    pub fn to_file(&mut self, path: impl AsRef<Path>) -> Result<u64> {
        let source = self.source.take()?;
        let path = path.as_ref();
        let mut file = File::create(path)?;
        let copied = source.copy_to(&mut file)?;
        file.flush()?;
        tracing::debug!(path = %path.display(), bytes = copied, "drained pipe to file");
        Ok(copied)
    }

    /// Writes the remaining content, decoded as UTF-8, to a text sink.
    ///
    /// Malformed UTF-8 is replaced with U+FFFD. The source is released; the
    /// text sink belongs to the caller and is never closed here.
    pub fn to_fmt<W: fmt::Write + ?Sized>(&mut self, out: &mut W) -> Result<()> {
        let text = self.to_text()?;
        out.write_str(&text).map_err(io::Error::other)?;
        Ok(())
    }

    /// Hands the pipe to `converter` and returns its result, then releases
    /// the source.
    pub fn to<T, F>(&mut self, converter: F) -> Result<T>
    where
        F: FnOnce(&mut Pipe) -> io::Result<T>,
    {
        self.to_with(converter, DrainConfig::close())
    }

    /// Hands the pipe to `converter` and returns its result.
    ///
    /// Fails with [`PipeError::Drained`] without calling `converter` if the
    /// pipe is already drained. With [`DrainConfig::close`] the source is released afterwards, even
    /// if `converter` fails. With [`DrainConfig::keep_open`] whatever
    /// `converter` left unread stays in the pipe.
    ///
    /// # Example
    ///
    /// ```
    /// use bytepipe::Pipe;
    ///
    /// let lines = Pipe::from_text("a\nb\nc").to(|p| Ok(p.to_text()?.lines().count()))?;
    /// assert_eq!(lines, 3);
    /// # Ok::<(), bytepipe::PipeError>(())
    /// ```
    pub fn to_with<T, F>(&mut self, converter: F, config: DrainConfig) -> Result<T>
    where
        F: FnOnce(&mut Pipe) -> io::Result<T>,
    {
        if self.source.is_drained() {
            return Err(PipeError::Drained);
        }
        let result = converter(self);
        if config.close {
            self.source = Source::Drained;
        }
        Ok(result?)
    }

    /// Reads the remaining content into memory and releases the source.
    pub fn to_bytes(&mut self) -> Result<Bytes> {
        let bytes = self.source.take()?.into_bytes()?;
        tracing::debug!(bytes = bytes.len(), "materialized pipe");
        Ok(bytes)
    }

    /// Reads the remaining content as UTF-8 text and releases the source.
    ///
    /// Malformed UTF-8 is replaced with U+FFFD. Read failures are returned,
    /// never turned into an empty string.
    pub fn to_text(&mut self) -> Result<String> {
        let bytes = self.to_bytes()?;
        Ok(match String::from_utf8(Vec::from(bytes)) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("source", &self.source)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl From<Bytes> for Pipe {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for Pipe {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&'static [u8]> for Pipe {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for Pipe {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<&str> for Pipe {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_pipe_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Pipe>();
    }

    #[test]
    fn test_round_trip_bytes() {
        let mut pipe = Pipe::from_bytes(vec![0u8, 1, 2, 255]);
        assert_eq!(pipe.to_bytes().unwrap(), vec![0u8, 1, 2, 255]);
        assert!(pipe.is_drained());
    }

    #[test]
    fn test_through_keeps_metadata() {
        let mut pipe = Pipe::from_text("abc")
            .with("k", 7u8)
            .through(|b| Ok(b))
            .unwrap();
        assert_eq!(pipe.get::<u8>("k"), Some(&7));
        assert_eq!(pipe.to_text().unwrap(), "abc");
    }

    #[test]
    fn test_through_on_reader() {
        let mut pipe = Pipe::from_reader(Cursor::new(b"xyz".to_vec()))
            .through(|b| Ok(b.to_ascii_uppercase()))
            .unwrap();
        assert_eq!(pipe.to_text().unwrap(), "XYZ");
    }

    #[test]
    fn test_through_drained_fails() {
        let mut pipe = Pipe::from_text("x");
        pipe.to_bytes().unwrap();
        let err = pipe.through(|b| Ok(b)).unwrap_err();
        assert!(err.is_drained());
    }

    #[test]
    fn test_to_releases_source_on_failure() {
        let mut pipe = Pipe::from_text("abc");
        let err = pipe
            .to(|_| -> io::Result<()> { Err(io::Error::other("converter failed")) })
            .unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::Other));
        assert!(pipe.is_drained());
    }

    #[test]
    fn test_to_keep_open_leaves_source() {
        let mut pipe = Pipe::from_text("abc");
        let has_key = pipe
            .to_with(|p| Ok(p.has("missing")), DrainConfig::keep_open())
            .unwrap();
        assert!(!has_key);
        assert!(!pipe.is_drained());
        assert_eq!(pipe.to_text().unwrap(), "abc");
    }

    #[test]
    fn test_to_text_lossy() {
        let mut pipe = Pipe::from_bytes(vec![b'o', b'k', 0xFF]);
        assert_eq!(pipe.to_text().unwrap(), "ok\u{FFFD}");
    }

    #[test]
    fn test_to_fmt() {
        let mut out = String::from("> ");
        Pipe::from_text("quoted").to_fmt(&mut out).unwrap();
        assert_eq!(out, "> quoted");
    }

    #[test]
    fn test_from_conversions() {
        let pipes: Vec<Pipe> = vec![
            Bytes::from_static(b"1").into(),
            vec![b'2'].into(),
            (&b"3"[..]).into(),
            String::from("4").into(),
            "5".into(),
        ];
        let joined: String = pipes
            .into_iter()
            .map(|mut p| p.to_text().unwrap())
            .collect();
        assert_eq!(joined, "12345");
    }

    #[test]
    fn test_debug() {
        let pipe = Pipe::from_text("ab").with("k", 1u8);
        assert_eq!(
            format!("{:?}", pipe),
            r#"Pipe { source: Memory(2 bytes), metadata: {"k"} }"#
        );
    }

    #[test]
    #[traced_test]
    fn test_drain_is_logged() {
        let mut out = Vec::new();
        Pipe::from_text("logged").to_writer(&mut out).unwrap();
        assert!(logs_contain("drained pipe to writer"));
    }
}

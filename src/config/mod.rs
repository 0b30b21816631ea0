//! Configuration for draining and opening pipes.
//!
//! - [`DrainConfig`] - Whether a drain closes its sink
//! - [`HttpConfig`] - Request settings for URL sources (feature `http`)
//!
//! # Example
//!
//! ```
//! use bytepipe::{DrainConfig, Pipe};
//!
//! let mut out = Vec::new();
//! let mut pipe = Pipe::from_text("hello");
//!
//! // Keep the sink open so more bytes can follow.
//! pipe.to_writer_with(&mut out, DrainConfig::keep_open())?;
//! out.extend_from_slice(b" world");
//!
//! assert_eq!(out, b"hello world");
//! # Ok::<(), bytepipe::PipeError>(())
//! ```

#[cfg(feature = "http")]
use std::time::Duration;

/// Size of the intermediate buffer used by every copy loop (8 KiB).
pub const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Default request timeout for URL sources (30 seconds).
#[cfg(feature = "http")]
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent for URL sources.
#[cfg(feature = "http")]
pub const DEFAULT_USER_AGENT: &str = concat!("bytepipe/", env!("CARGO_PKG_VERSION"));

/// Controls what a drain does with its sink (or, for converters, its source)
/// once all bytes have been delivered.
///
/// With `close` set (the default) the sink is flushed and dropped. With
/// `close` cleared the sink is left untouched, so pass it as `&mut sink` to
/// keep using it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrainConfig {
    /// Whether to close the sink after draining.
    pub close: bool,
}

impl DrainConfig {
    /// Creates a new drain configuration.
    pub const fn new(close: bool) -> Self {
        Self { close }
    }

    /// Flushes and closes the sink after draining.
    pub const fn close() -> Self {
        Self { close: true }
    }

    /// Leaves the sink open after draining.
    pub const fn keep_open() -> Self {
        Self { close: false }
    }
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self::close()
    }
}

/// Request settings for [`Pipe::from_url_with`](crate::Pipe::from_url_with).
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    timeout: Duration,
    user_agent: String,
}

#[cfg(feature = "http")]
impl HttpConfig {
    /// Sets the whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

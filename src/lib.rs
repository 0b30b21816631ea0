//! bytepipe
//!
//! Fluent, single-use byte pipes for Rust.
//!
//! `bytepipe` takes bytes from a source, optionally routes them through
//! whole-buffer transforms, and delivers them to a sink. It is designed for
//! the small glue jobs around file and stream I/O:
//!
//! - read a file, rewrite it, write it somewhere else
//! - turn a reader into a `String` or `Bytes` in one call
//! - cut one payload into many and handle each piece separately
//! - carry labels (file names, content types) alongside the bytes
//!
//! The crate intentionally:
//! - does NOT stream transforms (each transform sees the whole payload)
//! - does NOT retry or recover from I/O errors
//! - does NOT merge sources
//! - does NOT do async I/O
//!
//! Every copy moves through a fixed 8 KiB buffer.
//!
//! # Example
//!
//! ```
//! use bytepipe::{Pipe, PipeError};
//!
//! fn main() -> Result<(), PipeError> {
//!     let greeting = Pipe::from_text("hello")
//!         .through(|bytes| Ok(bytes.to_ascii_uppercase()))?
//!         .to_text()?;
//!     assert_eq!(greeting, "HELLO");
//!     Ok(())
//! }
//! ```
//!
//! # Splitting
//!
//! ```no_run
//! use bytepipe::{Pipe, PipeError};
//!
//! fn main() -> Result<(), PipeError> {
//!     let rows = Pipe::from_file("data.csv")?
//!         .with("source", "data.csv")
//!         .split(|bytes| Ok(bytes.split(|b| *b == b'\n').map(|l| l.to_vec()).collect::<Vec<_>>()))?;
//!
//!     for (i, mut row) in rows.enumerate() {
//!         row.to_file(format!("row-{}.csv", i))?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # URLs (feature = "http")
//!
//! ```ignore
//! use bytepipe::Pipe;
//!
//! let body = Pipe::from_url("https://example.com/")?.to_text()?;
//! # Ok::<(), bytepipe::PipeError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod metadata;
mod pipe;

mod buffer; // internal copy loop (thread-local reuse)
mod source; // internal source union

//
// Public surface
//

pub use config::{COPY_BUFFER_SIZE, DrainConfig};
pub use error::{PipeError, Result};
pub use metadata::Metadata;
pub use pipe::{Pipe, Split};

#[cfg(feature = "http")]
pub use config::HttpConfig;

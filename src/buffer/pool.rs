//! Thread-local pool of copy buffers.

use std::cell::RefCell;
use std::io::{ErrorKind, Read, Write};

use crate::config::COPY_BUFFER_SIZE;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A reusable, fixed-size copy buffer.
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer from the thread-local pool or creates a new one.
    pub fn take() -> Self {
        THREAD_BUFFER_POOL.with(|pool| {
            let mut pool = pool.borrow_mut();
            if let Some(data) = pool.pop() {
                Self { data }
            } else {
                Self {
                    data: vec![0u8; COPY_BUFFER_SIZE],
                }
            }
        })
    }

    /// Copies every remaining byte of `reader` into `writer`, one buffer at a time.
    ///
    /// Interrupted reads and writes are retried. Returns the number of bytes copied.
    pub fn copy<R, W>(&mut self, reader: &mut R, writer: &mut W) -> std::io::Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut self.data) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            writer.write_all(&self.data[..n])?;
            total += n as u64;
        }
        tracing::trace!(bytes = total, "copy finished");
        Ok(total)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.data.len()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // Only fixed-size buffers go back; contents are overwritten on next use.
        if self.data.len() == COPY_BUFFER_SIZE {
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

/// Copies `reader` into `writer` with a pooled buffer.
pub(crate) fn copy<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    Buffer::take().copy(reader, writer)
}

/// Reads `reader` to exhaustion into memory.
pub(crate) fn read_all<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    copy(reader, &mut out)?;
    Ok(out)
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Yields at most `step` bytes per read, with an `Interrupted` error before each one.
    struct Choppy {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        interrupt: bool,
    }

    impl Read for Choppy {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(std::io::Error::new(ErrorKind::Interrupted, "again"));
            }
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_buffer_take() {
        let buf = Buffer::take();
        assert_eq!(buf.len(), COPY_BUFFER_SIZE);
    }

    #[test]
    fn test_buffer_reuse() {
        {
            let _buf = Buffer::take();
        }

        let buf2 = Buffer::take();
        assert_eq!(buf2.len(), COPY_BUFFER_SIZE);
        THREAD_BUFFER_POOL.with(|pool| assert!(pool.borrow().len() < MAX_POOL_SIZE));
    }

    #[test]
    fn test_copy_larger_than_buffer() {
        let data: Vec<u8> = (0..COPY_BUFFER_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let mut out = Vec::new();
        let n = copy(&mut Cursor::new(&data), &mut out).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn test_copy_retries_interrupted() {
        let mut reader = Choppy {
            data: b"interrupted but complete".to_vec(),
            pos: 0,
            step: 5,
            interrupt: false,
        };
        let out = read_all(&mut reader).unwrap();
        assert_eq!(out, b"interrupted but complete");
    }

    #[test]
    fn test_copy_empty() {
        let out = read_all(&mut Cursor::new(Vec::new())).unwrap();
        assert!(out.is_empty());
    }
}

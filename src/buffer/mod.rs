//! Internal copy loop and buffer management.
//!
//! Every byte that moves between a source and a sink goes through a fixed
//! 8 KiB buffer taken from a thread-local pool. It is an implementation
//! detail and not part of the public API.

mod pool;

pub(crate) use pool::{copy, read_all};

//! Pipe engine.
//!
//! - [`Pipe`] - Single-use byte pipe: construct, transform, split, drain
//! - [`Split`] - Lazy iterator over the child pipes of a split

mod engine;
mod split;

pub use engine::Pipe;
pub use split::Split;

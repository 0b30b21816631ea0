//! File copy example.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/input /path/to/output

use std::env;

use bytepipe::Pipe;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let output = env::args()
        .nth(2)
        .unwrap_or_else(|| format!("{}.copy", input));

    println!("Copying {} -> {}\n", input, output);

    let mut lines = 0usize;
    let written = Pipe::from_file(&input)?
        .through(|bytes| {
            lines = bytes.iter().filter(|b| **b == b'\n').count();
            Ok(bytes)
        })?
        .to_file(&output)?;

    println!("Wrote {} bytes ({} lines)", written, lines);

    Ok(())
}

//! Split example: cut a reader into lines and drain each one.
//!
//! Run with:
//!     cargo run --example split_lines < some_file.txt

use std::io;

use bytepipe::Pipe;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lines = Pipe::from_reader(io::stdin())
        .with("source", "stdin")
        .split(|bytes| {
            Ok(bytes
                .split(|b| *b == b'\n')
                .filter(|line| !line.is_empty())
                .map(|line| bytes.slice_ref(line))
                .collect::<Vec<_>>())
        })?;

    println!("{} non-empty lines\n", lines.len());

    for (i, mut line) in lines.enumerate() {
        let source = line.get::<&str>("source").copied().unwrap_or("?");
        let text = line.to_text()?;
        println!("{}:{:>4}: {}", source, i + 1, text);
    }

    Ok(())
}

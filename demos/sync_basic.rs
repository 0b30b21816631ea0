//! Basic pipe example: transform text and drain it several ways.
//!
//! Run with:
//!     cargo run --example sync_basic

use std::io::Write;

use bytepipe::{DrainConfig, Pipe};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Materialize to a string
    let shout = Pipe::from_text("hello, pipes")
        .through(|bytes| Ok(bytes.to_ascii_uppercase()))?
        .to_text()?;
    println!("through: {}", shout);

    // Drain into a writer that stays open
    let mut report = Vec::new();
    for line in ["first line\n", "second line\n"] {
        Pipe::from_text(line).to_writer_with(&mut report, DrainConfig::keep_open())?;
    }
    report.write_all(b"(end)\n")?;
    print!("{}", String::from_utf8_lossy(&report));

    // Convert the whole pipe with a function
    let stats = Pipe::from_text("one two three four")
        .with("label", "words")
        .to(|pipe| {
            let label = pipe.get::<&str>("label").copied().unwrap_or("bytes");
            let count = pipe.to_text()?.split_whitespace().count();
            Ok(format!("{}: {}", label, count))
        })?;
    println!("to: {}", stats);

    Ok(())
}

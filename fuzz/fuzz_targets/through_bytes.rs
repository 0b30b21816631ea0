#![no_main]

use std::io::Cursor;

use bytepipe::{DrainConfig, Pipe, PipeError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    // Verify: identity transform preserves bytes for both source kinds
    let from_memory = Pipe::from_bytes(data.clone())
        .through(Ok)
        .unwrap()
        .to_bytes()
        .unwrap();
    assert_eq!(from_memory, data);

    let mut out = Vec::new();
    let copied = Pipe::from_reader(Cursor::new(data.clone()))
        .through(Ok)
        .unwrap()
        .to_writer_with(&mut out, DrainConfig::keep_open())
        .unwrap();
    assert_eq!(copied, data.len() as u64);
    assert_eq!(out, data);

    // Verify: text round trip matches lossy decoding
    let text = Pipe::from_bytes(data.clone()).to_text().unwrap();
    assert_eq!(text, String::from_utf8_lossy(&data));

    // Verify: a drained pipe stays drained
    let mut pipe = Pipe::from_bytes(data);
    pipe.to_bytes().unwrap();
    assert!(matches!(pipe.to_bytes(), Err(PipeError::Drained)));
});

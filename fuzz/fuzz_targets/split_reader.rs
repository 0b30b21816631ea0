#![no_main]

use std::io::Cursor;

use bytepipe::Pipe;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (delimiter, data) = input;

    let expected: Vec<&[u8]> = data.split(|b| *b == delimiter).collect();

    let parts = Pipe::from_reader(Cursor::new(data.clone()))
        .with("delimiter", delimiter)
        .split(|bytes| {
            Ok(bytes
                .split(|b| *b == delimiter)
                .map(|part| bytes.slice_ref(part))
                .collect::<Vec<_>>())
        })
        .unwrap();

    // Verify: count and order match the splitter output
    assert_eq!(parts.len(), expected.len());
    for (mut part, want) in parts.zip(expected) {
        assert_eq!(part.get::<u8>("delimiter"), Some(&delimiter));
        assert_eq!(part.to_bytes().unwrap(), want);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use packfile_rs::PackReader;
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    // Parse from memory - should never panic
    let mut reader = match PackReader::new(Cursor::new(data)) {
        Ok(r) => r,
        Err(_) => return, // Expected for invalid data
    };

    let names: Vec<String> = reader.entries().map(|e| e.name().to_string()).collect();

    // Decode every entry through each pipeline stage - should never panic
    for name in &names {
        let _ = reader.read_entry(name);

        if let Ok(mut stream) = reader.extract_raw(name) {
            let mut sink = Vec::new();
            let _ = stream.read_to_end(&mut sink);
        }
    }

    let _ = reader.summary().to_json();
    let _ = reader.contains("");
    let _ = reader.contains("/");
    let _ = reader.get_mut("\\");
});

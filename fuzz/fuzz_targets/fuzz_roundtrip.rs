#![no_main]
use libfuzzer_sys::fuzz_target;
use xmldict::{parse_str, to_xml};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse -> serialize -> parse roundtrip should never panic
        if let Ok(map) = parse_str(s) {
            let output = to_xml(&map);
            let _ = parse_str(&output);
        }
    }
});

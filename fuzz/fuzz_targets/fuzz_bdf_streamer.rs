#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use almabdf::bdf::{BdfStreamReader, ReaderConfig};

fuzz_target!(|data: &[u8]| {
    // Any input must either decode or fail with an error, never panic
    let mut reader = BdfStreamReader::with_config(ReaderConfig::default());
    if reader.open_reader(Cursor::new(data), "fuzz").is_err() {
        return;
    }

    for _ in 0..100 {
        match reader.has_subset() {
            Ok(true) => {}
            Ok(false) | Err(_) => break,
        }
        match reader.get_subset() {
            Ok(subset) => {
                for attachment in subset.attachments() {
                    let _ = attachment.values();
                }
            }
            Err(_) => break,
        }
    }
    reader.close();
});

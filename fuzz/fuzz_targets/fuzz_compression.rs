#![no_main]

use bancho_protocol::config::DEFAULT_MAX_PAYLOAD_SIZE;
use bancho_protocol::utils::compression::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Round-trip must be lossless whenever the input fits the limit
    if let Ok(compressed) = compress(data, 6) {
        if data.len() <= DEFAULT_MAX_PAYLOAD_SIZE {
            let out = decompress(&compressed, DEFAULT_MAX_PAYLOAD_SIZE);
            assert_eq!(out.as_deref().ok(), Some(data));
        }
    }

    // Raw input exercises the corrupt-stream and bomb-cap paths
    let _ = decompress(data, DEFAULT_MAX_PAYLOAD_SIZE);
});

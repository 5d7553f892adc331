//! Fuzz test for DNS seed hostname decoding
//!
//! Seed answers come from third parties; any hostname must either decode to
//! a valid key or be rejected, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark_bootstrap::dns::{decode_node_host, encode_node_label};

fuzz_target!(|data: &[u8]| {
    if let Ok(host) = std::str::from_utf8(data) {
        if let Ok(public_key) = decode_node_host(host) {
            // Anything accepted re-encodes to a label that decodes to the same key
            let label = encode_node_label(&public_key).unwrap();
            assert_eq!(decode_node_host(&label).unwrap(), public_key);
        }
    }
});

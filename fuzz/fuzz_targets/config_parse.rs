//! Fuzz test for configuration file parsing
//!
//! Tests that arbitrary TOML input doesn't cause panics when parsed and
//! validated as WAYMARK configuration.

#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark_bootstrap::BootstrapConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Invalid configs are rejected, never panic
        if let Ok(config) = toml::from_str::<BootstrapConfig>(s) {
            let _ = config.validate();
        }
    }
});

//! Fuzz target for trends.json parsing and validation.
//!
//! Arbitrary input must produce a config or an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nt_config::TrendConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = TrendConfig::from_str(text) {
        let _ = nt_config::validate::validate_trends(&config);
    }
});

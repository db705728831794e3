//! Fuzz target: `ProjectorConfig::from_json`
//!
//! Feeds arbitrary UTF-8 to the build-time config parser and verifies:
//! - No panics under arbitrary input
//! - Any accepted config passes `validate()` and keeps min ≤ default ≤ max
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use beckview::config::ProjectorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ProjectorConfig::from_json(json) {
        assert!(config.validate().is_ok());
        assert!(config.min_frequency_hz >= 1);
        assert!(config.min_frequency_hz <= config.default_frequency_hz);
        assert!(config.default_frequency_hz <= config.max_frequency_hz);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use appdrawer::config::DrawerConfig;

fuzz_target!(|data: &[u8]| {
    // Config files are user-editable on disk, so deserialization must reject
    // malformed input without crashing
    if let Ok(s) = std::str::from_utf8(data) {
        let _result: Result<DrawerConfig, _> = serde_json::from_str(s);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use appdrawer::apps::UserKey;
use appdrawer::platform::package_of;

fuzz_target!(|data: &[u8]| {
    // Wire keys arrive from persisted config and platform signals, so parsing
    // must tolerate arbitrary text without panicking
    if let Ok(s) = std::str::from_utf8(data) {
        let _parsed = UserKey::parse(s);
        let key = UserKey::parse_or_default(s, 0);
        let _package = package_of(&key.component);
    }
});

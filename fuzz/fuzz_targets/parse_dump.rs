#![no_main]

use libfuzzer_sys::fuzz_target;
use showcase_core::{DumpParser, ShowcaseConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(parser) = DumpParser::from_config(&ShowcaseConfig::default()) else {
        return;
    };
    for row in parser.parse(text, "2025-01-01") {
        assert!(!row.get("title").trim().is_empty());
        assert!(row.get("embedUrl").is_empty());
    }
});

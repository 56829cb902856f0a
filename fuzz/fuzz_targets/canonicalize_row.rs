#![no_main]

use libfuzzer_sys::fuzz_target;
use showcase_core::canonical::{Canonicalizer, ROSTER_HEADERS, RawRow};

// Cells are split from the input on '\x1f', in header order.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let row: RawRow = ROSTER_HEADERS
        .iter()
        .copied()
        .zip(text.split('\x1f'))
        .collect();

    if let Ok(canonical) = Canonicalizer::default().canonicalize(&row, None) {
        let project = canonical.project;
        assert!(!project.embed_url.is_empty());
        assert!(!project.grade.is_empty());
        assert!(project.tags.iter().all(|tag| tag.trim() == tag && !tag.is_empty()));
    }
});

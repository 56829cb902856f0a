//! Deterministic slug generation from free text.
//!
//! Slugs double as project ids and roster filenames, so the output must be
//! stable for a given input. Distinct inputs that collapse to the same slug
//! are not disambiguated here; see [`crate::ingest`] for duplicate reporting.

/// Join the non-empty `parts` with `-` and reduce the result to `[a-z0-9-]`.
///
/// Every run of characters outside `[a-z0-9]` becomes a single hyphen and
/// leading/trailing hyphens are stripped. Never fails; the worst case is an
/// empty string.
#[must_use]
pub fn normalize<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let mut out = String::with_capacity(joined.len());
    let mut pending_hyphen = false;
    for ch in joined.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Convenience wrapper for a single piece of text.
#[must_use]
pub fn slugify(text: &str) -> String {
    normalize(&[text])
}

/// Return at most `max_chars` leading characters of `text`.
///
/// Used to bound the title portion of generated ids; counts chars, not bytes.
#[must_use]
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

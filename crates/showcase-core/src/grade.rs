//! Grade label derivation from class names.
//!
//! Class names follow a loose `ROOM - G<n> - Name` convention, with a few
//! multi-grade groups that do not. The rules are checked in priority order:
//!
//! 1. a word-delimited `G<digit>` token → `Grade <digit>`
//! 2. `2-8` or `2–8` anywhere → `Multi (2–8)`
//! 3. `ULTIMATE` anywhere, case-insensitive → `Multi`
//! 4. otherwise `Other`

use regex::Regex;
use std::sync::OnceLock;

/// Label for the mixed 2nd–8th grade group.
pub const MULTI_RANGE: &str = "Multi (2–8)";
/// Label for the all-grades group.
pub const MULTI: &str = "Multi";
/// Fallback label when no rule matches.
pub const OTHER: &str = "Other";

fn grade_token() -> &'static Regex {
    static GRADE_TOKEN: OnceLock<Regex> = OnceLock::new();
    GRADE_TOKEN.get_or_init(|| Regex::new(r"\bG(\d)\b").expect("grade token pattern is valid"))
}

/// Derive a grade label from a class name. Pure and total.
#[must_use]
pub fn derive_grade(class_name: &str) -> String {
    if let Some(digit) = grade_token()
        .captures(class_name)
        .and_then(|caps| caps.get(1))
    {
        return format!("Grade {}", digit.as_str());
    }

    if class_name.contains("2-8") || class_name.contains("2–8") {
        return MULTI_RANGE.to_string();
    }

    if class_name.to_uppercase().contains("ULTIMATE") {
        return MULTI.to_string();
    }

    OTHER.to_string()
}

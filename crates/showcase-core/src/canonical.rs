//! Record canonicalization: one raw roster row in, one [`Project`] out.
//!
//! Required fields (`id`, `title`, `student`, `klass`, `embedUrl`) must be
//! non-empty after trimming or the row is rejected. Everything else is soft:
//! a missing grade is derived from the class name and an embed link without
//! the expected marker is accepted with a warning.

use crate::error::ShowcaseError;
use crate::grade::derive_grade;
use crate::model::Project;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical roster column set, in order.
pub const ROSTER_HEADERS: [&str; 9] = [
    "id",
    "title",
    "student",
    "klass",
    "grade",
    "thumbnail",
    "embedUrl",
    "tags",
    "date",
];

/// Substring every shareable embed link contains.
pub const DEFAULT_EMBED_MARKER: &str = "tinkercad.com/embed/";

const REQUIRED_FIELDS: [&str; 5] = ["id", "title", "student", "klass", "embedUrl"];

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// A raw roster row: column name → cell text, accessed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawRow {
    fields: BTreeMap<String, String>,
}

impl RawRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any previous value for `column`.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Trimmed cell text; absent columns read as empty.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", |value| value.trim())
    }

    /// Cells in canonical column order, for writing roster files.
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        ROSTER_HEADERS
            .iter()
            .map(|column| self.get(column).to_string())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// A row that cannot become a project.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("incomplete row (missing {})", .missing.join(", "))]
pub struct Rejected {
    /// Required columns that were empty, in canonical order.
    pub missing: Vec<&'static str>,
}

impl Rejected {
    /// Short reason shared by every rejection.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        "incomplete row"
    }
}

/// An accepted row plus any soft-validation findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub project: Project,
    /// The embed link lacks the expected marker.
    pub malformed_embed: bool,
}

// ---------------------------------------------------------------------------
// Canonicalizer
// ---------------------------------------------------------------------------

/// Split a tags cell: `,` and `;` both separate, pieces are trimmed,
/// empties dropped, order kept, duplicates kept.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validates and normalizes raw rows against one embed marker.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    embed_marker: String,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_EMBED_MARKER)
    }
}

impl Canonicalizer {
    #[must_use]
    pub fn new(embed_marker: impl Into<String>) -> Self {
        Self {
            embed_marker: embed_marker.into(),
        }
    }

    /// Canonicalize one row.
    ///
    /// Grade resolution order: the row's own `grade`, then `known_grade`,
    /// then [`derive_grade`] on `klass`.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] if any required field is empty after trimming.
    pub fn canonicalize(
        &self,
        row: &RawRow,
        known_grade: Option<&str>,
    ) -> Result<Canonical, Rejected> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| row.get(field).is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(Rejected { missing });
        }

        let klass = row.get("klass");
        let grade = match (row.get("grade"), known_grade.map(str::trim)) {
            (grade, _) if !grade.is_empty() => grade.to_string(),
            (_, Some(known)) if !known.is_empty() => known.to_string(),
            _ => derive_grade(klass),
        };

        let embed_url = row.get("embedUrl");
        let malformed_embed = !embed_url.contains(self.embed_marker.as_str());

        Ok(Canonical {
            project: Project {
                id: row.get("id").to_string(),
                title: row.get("title").to_string(),
                student: row.get("student").to_string(),
                klass: klass.to_string(),
                grade,
                thumbnail: row.get("thumbnail").to_string(),
                embed_url: embed_url.to_string(),
                tags: parse_tags(row.get("tags")),
                date: row.get("date").to_string(),
            },
            malformed_embed,
        })
    }
}

// ---------------------------------------------------------------------------
// Keyword tagging
// ---------------------------------------------------------------------------

/// Config-side description of a keyword rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Regex matched case-insensitively against the title.
    pub pattern: String,
    pub tag: String,
}

impl KeywordRule {
    #[must_use]
    pub fn new(pattern: &str, tag: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            tag: tag.to_string(),
        }
    }
}

/// The stock keyword groups.
#[must_use]
pub fn default_keyword_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("tree|house", "treehouse"),
        KeywordRule::new("rocket|mars", "space"),
        KeywordRule::new("circuit|wire|simulate|components", "circuits"),
    ]
}

#[derive(Debug, Clone)]
struct CompiledRule {
    matcher: Regex,
    tag: String,
}

/// Ordered keyword table; every matching rule contributes its tag.
#[derive(Debug, Clone)]
pub struct KeywordTagger {
    rules: Vec<CompiledRule>,
}

impl KeywordTagger {
    /// Compile a rule table.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError::InvalidPattern`] for the first pattern
    /// that does not compile.
    pub fn from_rules(rules: &[KeywordRule]) -> Result<Self, ShowcaseError> {
        let rules = rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|matcher| CompiledRule {
                        matcher,
                        tag: rule.tag.clone(),
                    })
                    .map_err(|source| ShowcaseError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Tags for every rule matching `title`, in table order.
    #[must_use]
    pub fn tags_for(&self, title: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.matcher.is_match(title))
            .map(|rule| rule.tag.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

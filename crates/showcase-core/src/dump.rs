//! Class-page dump parsing.
//!
//! An instructor copies the text of a class "Designs" page and pastes it into a
//! file. In that text each design's title is the last non-empty line above
//! the student's username. [`DumpParser`] recovers the `(title, user)`
//! pairs and turns them into roster rows with the embed link left blank for
//! the instructor to fill in.

use crate::canonical::{KeywordTagger, RawRow};
use crate::config::{DumpConfig, ShowcaseConfig};
use crate::error::ShowcaseError;
use crate::grade::derive_grade;
use crate::slug::{normalize, prefix_chars, slugify};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::HashSet;

/// One recovered design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DumpEntry {
    pub title: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct DumpParser {
    user: Regex,
    ignore: HashSet<String>,
    tagger: KeywordTagger,
    class_name: String,
    grade: String,
    id_prefix: String,
    title_prefix_chars: usize,
}

impl DumpParser {
    /// Compile the username pattern and keyword table from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError::InvalidPattern`] if either regex source is
    /// invalid.
    pub fn from_config(config: &ShowcaseConfig) -> Result<Self, ShowcaseError> {
        Self::new(&config.dump, config.keyword_tagger()?)
    }

    /// # Errors
    ///
    /// Returns [`ShowcaseError::InvalidPattern`] if `user_pattern` is invalid.
    pub fn new(dump: &DumpConfig, tagger: KeywordTagger) -> Result<Self, ShowcaseError> {
        let user = RegexBuilder::new(&dump.user_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ShowcaseError::InvalidPattern {
                pattern: dump.user_pattern.clone(),
                source,
            })?;

        let grade = if dump.grade.trim().is_empty() {
            derive_grade(&dump.class_name)
        } else {
            dump.grade.trim().to_string()
        };
        let id_prefix = if dump.id_prefix.trim().is_empty() {
            slugify(&dump.class_name)
        } else {
            dump.id_prefix.trim().to_string()
        };

        Ok(Self {
            user,
            ignore: dump.ignore_titles.iter().cloned().collect(),
            tagger,
            class_name: dump.class_name.clone(),
            grade,
            id_prefix,
            title_prefix_chars: dump.title_prefix_chars,
        })
    }

    fn is_user(&self, line: &str) -> bool {
        self.user.is_match(line)
    }

    /// Unique `(title, user)` pairs in first-seen order.
    #[must_use]
    pub fn entries(&self, text: &str) -> Vec<DumpEntry> {
        let mut seen: HashSet<DumpEntry> = HashSet::new();
        let mut entries = Vec::new();
        let mut previous = "";

        for line in text.lines().map(str::trim) {
            if self.is_user(line) {
                let title = previous.trim();
                if !title.is_empty() && !self.ignore.contains(title) && !self.is_user(title) {
                    let entry = DumpEntry {
                        title: title.to_string(),
                        user: line.to_string(),
                    };
                    if seen.insert(entry.clone()) {
                        entries.push(entry);
                    }
                }
            }
            if !line.is_empty() {
                previous = line;
            }
        }

        entries
    }

    /// Roster row for one entry, dated `date`.
    #[must_use]
    pub fn roster_row(&self, entry: &DumpEntry, date: &str) -> RawRow {
        let title_part = prefix_chars(&entry.title, self.title_prefix_chars);
        let id = normalize(&[self.id_prefix.as_str(), entry.user.as_str(), title_part]);
        let tags = self.tagger.tags_for(&entry.title).join(";");

        [
            ("id", id.as_str()),
            ("title", entry.title.as_str()),
            ("student", entry.user.as_str()),
            ("klass", self.class_name.as_str()),
            ("grade", self.grade.as_str()),
            ("thumbnail", ""),
            ("embedUrl", ""),
            ("tags", tags.as_str()),
            ("date", date),
        ]
        .into_iter()
        .collect()
    }

    /// Parse `text` straight into roster rows.
    #[must_use]
    pub fn parse(&self, text: &str, date: &str) -> Vec<RawRow> {
        self.entries(text)
            .iter()
            .map(|entry| self.roster_row(entry, date))
            .collect()
    }
}

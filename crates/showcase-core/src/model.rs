//! Canonical entities and the exported snapshot document.

use crate::grade::derive_grade;
use serde::{Deserialize, Serialize};

/// Default slideshow auto-advance interval.
pub const DEFAULT_AUTOPLAY_MS: u64 = 9000;

/// Today's local date as `YYYY-MM-DD`, the snapshot `updated` format.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// A canonical student project.
///
/// Only constructed by the canonicalizer (or loaded from an exported
/// snapshot); the required fields are non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub student: String,
    pub klass: String,
    pub grade: String,
    /// Empty means "no image".
    pub thumbnail: String,
    pub embed_url: String,
    /// Insertion order preserved, duplicates allowed.
    pub tags: Vec<String>,
    /// ISO-ish date; empty sorts lowest.
    pub date: String,
}

impl Project {
    /// Lowercased text matched by free-text search: title, student, tags, class.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.student.len() + self.klass.len() + 16,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.student);
        text.push(' ');
        text.push_str(&self.tags.join(" "));
        text.push(' ');
        text.push_str(&self.klass);
        text.to_lowercase()
    }

    /// Snapshot names of the required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", &self.id),
            ("title", &self.title),
            ("student", &self.student),
            ("klass", &self.klass),
            ("embedUrl", &self.embed_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether a thumbnail image is set.
    #[must_use]
    pub fn has_thumbnail(&self) -> bool {
        !self.thumbnail.trim().is_empty()
    }
}

/// A class roster entry. `name` is the unique key projects reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Class {
    pub name: String,
    pub grade: String,
    pub count: u32,
    pub created: String,
}

impl Class {
    /// Build a class entry, deriving its grade label from the name.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32, created: impl Into<String>) -> Self {
        let name = name.into();
        let grade = derive_grade(&name);
        Self {
            name,
            grade,
            count,
            created: created.into(),
        }
    }
}

/// Snapshot-level metadata consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub title: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default = "default_autoplay_ms")]
    pub autoplay_ms: u64,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: String::new(),
            updated: String::new(),
            autoplay_ms: DEFAULT_AUTOPLAY_MS,
        }
    }
}

const fn default_autoplay_ms() -> u64 {
    DEFAULT_AUTOPLAY_MS
}

/// The exported snapshot: `{ meta, classes, projects }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dataset {
    pub meta: Meta,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Dataset {
    /// Parse a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid snapshot document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize as pretty-printed JSON, non-ASCII preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! Project (`showcase.toml`) and user-level configuration.
//!
//! Every value has a default, so a missing `showcase.toml` yields a working
//! setup for the stock class roster. Configuration is passed into ingestion
//! and dump parsing as a value; nothing here is process-global.

use crate::canonical::{Canonicalizer, DEFAULT_EMBED_MARKER, KeywordRule, KeywordTagger};
use crate::error::ShowcaseError;
use crate::model::{Class, DEFAULT_AUTOPLAY_MS, Meta};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "showcase.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    #[serde(default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default = "default_classes")]
    pub classes: Vec<ClassConfig>,
    #[serde(default = "crate::canonical::default_keyword_rules")]
    pub keyword_rules: Vec<KeywordRule>,
    #[serde(default)]
    pub dump: DumpConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            meta: MetaConfig::default(),
            paths: PathsConfig::default(),
            ingest: IngestConfig::default(),
            classes: default_classes(),
            keyword_rules: crate::canonical::default_keyword_rules(),
            dump: DumpConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    /// Configured classes with derived grade labels.
    #[must_use]
    pub fn class_list(&self) -> Vec<Class> {
        self.classes.iter().map(ClassConfig::to_class).collect()
    }

    /// Snapshot metadata stamped with `updated`.
    #[must_use]
    pub fn snapshot_meta(&self, updated: &str) -> Meta {
        Meta {
            title: self.meta.title.clone(),
            updated: updated.to_string(),
            autoplay_ms: self.meta.autoplay_ms,
        }
    }

    #[must_use]
    pub fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::new(self.ingest.embed_marker.clone())
    }

    /// Compile the configured keyword table.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule pattern is not a valid regex.
    pub fn keyword_tagger(&self) -> Result<KeywordTagger, ShowcaseError> {
        KeywordTagger::from_rules(&self.keyword_rules)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_autoplay_ms")]
    pub autoplay_ms: u64,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            autoplay_ms: default_autoplay_ms(),
        }
    }
}

/// Filesystem layout, relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_rosters")]
    pub rosters: PathBuf,
    #[serde(default = "default_images")]
    pub images: PathBuf,
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            rosters: default_rosters(),
            images: default_images(),
            dataset: default_dataset(),
        }
    }
}

impl PathsConfig {
    #[must_use]
    pub fn root_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.root)
    }

    #[must_use]
    pub fn rosters_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.rosters)
    }

    #[must_use]
    pub fn images_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.images)
    }

    #[must_use]
    pub fn dataset_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.dataset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_embed_marker")]
    pub embed_marker: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            embed_marker: default_embed_marker(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub name: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub created: String,
}

impl ClassConfig {
    #[must_use]
    pub fn to_class(&self) -> Class {
        Class::new(self.name.clone(), self.count, self.created.clone())
    }
}

/// Settings for turning a pasted class page into a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Regex a username line must match (case-insensitive).
    #[serde(default = "default_user_pattern")]
    pub user_pattern: String,
    #[serde(default = "default_dump_class")]
    pub class_name: String,
    /// Empty means derive from `class_name`.
    #[serde(default)]
    pub grade: String,
    /// Empty means the slug of `class_name`.
    #[serde(default)]
    pub id_prefix: String,
    #[serde(default = "default_title_prefix_chars")]
    pub title_prefix_chars: usize,
    /// Page chrome that sits above a username but is never a title.
    #[serde(default = "default_ignore_titles")]
    pub ignore_titles: Vec<String>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            user_pattern: default_user_pattern(),
            class_name: default_dump_class(),
            grade: String::new(),
            id_prefix: String::new(),
            title_prefix_chars: default_title_prefix_chars(),
            ignore_titles: default_ignore_titles(),
        }
    }
}

/// Per-user preferences under `<config_dir>/showcase/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Default output mode: `pretty`, `text` or `json`.
    #[serde(default)]
    pub output: Option<String>,
}

/// Load `showcase.toml` from `project_root`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<ShowcaseConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ShowcaseConfig::default());
    }
    load_config_file(&path)
}

/// Load an explicit config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<ShowcaseConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ShowcaseConfig>(&content).map_err(|err| {
        ShowcaseError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;
    Ok(config)
}

/// Load the per-user config, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("showcase/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_title() -> String {
    "STEM Tinkercad Showcase".to_string()
}

const fn default_autoplay_ms() -> u64 {
    DEFAULT_AUTOPLAY_MS
}

fn default_root() -> PathBuf {
    PathBuf::from("showcase")
}

fn default_rosters() -> PathBuf {
    PathBuf::from("showcase/rosters")
}

fn default_images() -> PathBuf {
    PathBuf::from("showcase/images")
}

fn default_dataset() -> PathBuf {
    PathBuf::from("showcase/projects.json")
}

fn default_embed_marker() -> String {
    DEFAULT_EMBED_MARKER.to_string()
}

fn default_user_pattern() -> String {
    r"^Kappa_\d{3}$".to_string()
}

fn default_dump_class() -> String {
    "RM225 - G3 - Kappa".to_string()
}

const fn default_title_prefix_chars() -> usize {
    40
}

fn default_ignore_titles() -> Vec<String> {
    [
        "Private",
        "Edited",
        "React",
        "View in 3D",
        "Upload Image",
        "Tinker this",
        "Download",
        "Share class link",
        "Students",
        "Activities",
        "Designs",
        "Moderation",
        "Co-teachers",
        "Share to Classroom",
        "Copy link",
        "Change visibility to share",
        "Report content",
        "Start Simulating",
        "Editing Components",
        "Wiring Components",
        "View It",
        "Place It",
        "Learn the Moves",
        "undefined",
        "Tomorrow's innovators are made today",
        "Start Tinkering",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_classes() -> Vec<ClassConfig> {
    let roster: [(&str, u32, &str); 15] = [
        ("Gonzalez-ULTIMATE", 150, "2025-09-15"),
        ("Rise - 2-8", 100, "2025-09-05"),
        ("RM325 - G5 - Omicron", 25, "2025-09-05"),
        ("RM324 - G5 - Xi", 25, "2025-09-05"),
        ("RM234 - G4 - Nu", 25, "2025-09-05"),
        ("RM235 - G4 - Mu", 25, "2025-09-05"),
        ("RM234 - G4 - Lambda", 25, "2025-09-05"),
        ("RM225 - G3 - Kappa", 25, "2025-09-05"),
        ("RM224 - G3 - Iota", 25, "2025-09-05"),
        ("RM222 - G2 - Theta", 25, "2025-09-05"),
        ("RM220 - G2 - Eta", 25, "2025-09-05"),
        ("RM223 - G2 - Zeta", 25, "2025-09-05"),
        ("RM143 - G1 - Epsilon", 25, "2025-09-05"),
        ("RM142 - G1 - Delta", 25, "2025-09-05"),
        ("RM141 - G1 - Gamma", 25, "2025-09-05"),
    ];
    roster
        .into_iter()
        .map(|(name, count, created)| ClassConfig {
            name: name.to_string(),
            count,
            created: created.to_string(),
        })
        .collect()
}

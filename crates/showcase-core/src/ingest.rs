//! Roster ingestion: raw rows from one or more sources in, a [`Catalog`]
//! and an [`IngestReport`] out.
//!
//! Ingestion never fails as a whole. Rows missing a required field are
//! skipped, soft problems become warnings, and everything else lands in the
//! catalog in source order.

use crate::canonical::{Canonicalizer, ROSTER_HEADERS, RawRow};
use crate::catalog::Catalog;
use crate::config::ShowcaseConfig;
use crate::model::{Class, Project};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// One batch of raw rows, usually a roster file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSource {
    /// Human label for reports, typically the file name.
    pub name: String,
    /// Header row as read; `None` skips the schema check. A file with no
    /// header row reads as `Some(vec![])` and is flagged.
    pub headers: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
    /// Grade assumed for rows that leave `grade` blank.
    pub known_grade: Option<String>,
}

impl RosterSource {
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers: Some(headers),
            rows,
            known_grade: None,
        }
    }

    /// A source with no header row to validate, such as rows built in memory.
    #[must_use]
    pub fn unchecked(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers: None,
            rows,
            known_grade: None,
        }
    }

    #[must_use]
    pub fn with_known_grade(mut self, grade: impl Into<String>) -> Self {
        self.known_grade = Some(grade.into());
        self
    }
}

/// Whether `headers` is exactly the canonical roster header set, in order.
#[must_use]
pub fn headers_match(headers: &[String]) -> bool {
    headers.len() == ROSTER_HEADERS.len()
        && headers
            .iter()
            .zip(ROSTER_HEADERS)
            .all(|(found, expected)| found.trim() == expected)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A row left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub source: String,
    /// 1-based data row number within the source (header excluded).
    pub row_number: usize,
    pub row: RawRow,
    pub reason: String,
    pub missing: Vec<String>,
}

/// Non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestWarning {
    UnexpectedSchema {
        source: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    MalformedEmbedLink {
        source: String,
        row_number: usize,
        id: String,
        embed_url: String,
    },
    DuplicateId {
        source: String,
        row_number: usize,
        id: String,
        first_source: String,
    },
}

impl IngestWarning {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedSchema { .. } => "unexpected_schema",
            Self::MalformedEmbedLink { .. } => "malformed_embed_link",
            Self::DuplicateId { .. } => "duplicate_id",
        }
    }
}

impl std::fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedSchema { source, found, .. } => write!(
                f,
                "{source}: unexpected headers [{}]",
                found.join(", ")
            ),
            Self::MalformedEmbedLink {
                source,
                row_number,
                id,
                ..
            } => write!(f, "{source} row {row_number}: '{id}' embed link looks malformed"),
            Self::DuplicateId {
                source,
                row_number,
                id,
                first_source,
            } => write!(
                f,
                "{source} row {row_number}: duplicate id '{id}' (first seen in {first_source})"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub skipped: Vec<SkippedRow>,
    pub warnings: Vec<IngestWarning>,
}

impl IngestReport {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} accepted, {} skipped, {} warnings",
            self.accepted,
            self.skipped.len(),
            self.warnings.len()
        )
    }
}

/// Result of one ingestion run.
#[derive(Debug, Clone)]
pub struct Ingestion {
    pub catalog: Catalog,
    pub report: IngestReport,
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

/// Configured ingestion pipeline.
#[derive(Debug, Clone)]
pub struct Ingestor {
    canonicalizer: Canonicalizer,
    classes: Vec<Class>,
}

impl Ingestor {
    #[must_use]
    pub const fn new(canonicalizer: Canonicalizer, classes: Vec<Class>) -> Self {
        Self {
            canonicalizer,
            classes,
        }
    }

    #[must_use]
    pub fn from_config(config: &ShowcaseConfig) -> Self {
        Self::new(config.canonicalizer(), config.class_list())
    }

    /// Ingest every source in order.
    #[must_use]
    pub fn ingest(&self, sources: &[RosterSource]) -> Ingestion {
        let mut report = IngestReport::default();
        let mut projects: Vec<Project> = Vec::new();
        let mut first_seen: HashMap<String, String> = HashMap::new();

        for source in sources {
            if let Some(headers) = &source.headers
                && !headers_match(headers)
            {
                warn!(
                    source = %source.name,
                    found = ?headers,
                    "roster headers do not match the canonical column set"
                );
                report.warnings.push(IngestWarning::UnexpectedSchema {
                    source: source.name.clone(),
                    expected: ROSTER_HEADERS.iter().map(ToString::to_string).collect(),
                    found: headers.clone(),
                });
            }

            for (index, row) in source.rows.iter().enumerate() {
                let row_number = index + 1;
                let canonical = match self
                    .canonicalizer
                    .canonicalize(row, source.known_grade.as_deref())
                {
                    Ok(canonical) => canonical,
                    Err(rejected) => {
                        debug!(
                            source = %source.name,
                            row_number,
                            missing = ?rejected.missing,
                            "skipping incomplete row"
                        );
                        report.skipped.push(SkippedRow {
                            source: source.name.clone(),
                            row_number,
                            row: row.clone(),
                            reason: rejected.reason().to_string(),
                            missing: rejected.missing.iter().map(ToString::to_string).collect(),
                        });
                        continue;
                    }
                };

                let project = canonical.project;
                if canonical.malformed_embed {
                    warn!(
                        source = %source.name,
                        row_number,
                        id = %project.id,
                        "embed link does not look like a shareable embed"
                    );
                    report.warnings.push(IngestWarning::MalformedEmbedLink {
                        source: source.name.clone(),
                        row_number,
                        id: project.id.clone(),
                        embed_url: project.embed_url.clone(),
                    });
                }

                if let Some(first_source) = first_seen.get(&project.id) {
                    warn!(source = %source.name, row_number, id = %project.id, "duplicate project id");
                    report.warnings.push(IngestWarning::DuplicateId {
                        source: source.name.clone(),
                        row_number,
                        id: project.id.clone(),
                        first_source: first_source.clone(),
                    });
                } else {
                    first_seen.insert(project.id.clone(), source.name.clone());
                }

                projects.push(project);
            }
        }

        report.accepted = projects.len();
        info!(
            sources = sources.len(),
            accepted = report.accepted,
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            "ingest complete"
        );

        Ingestion {
            catalog: Catalog::new(projects, self.classes.clone()),
            report,
        }
    }
}

/// Ingest `sources` with the pipeline described by `config`.
#[must_use]
pub fn ingest(sources: &[RosterSource], config: &ShowcaseConfig) -> Ingestion {
    Ingestor::from_config(config).ingest(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_headers() -> Vec<String> {
        ROSTER_HEADERS.iter().map(ToString::to_string).collect()
    }

    fn row(id: &str, title: &str, embed: &str) -> RawRow {
        [
            ("id", id),
            ("title", title),
            ("student", "Ava G."),
            ("klass", "RM225 - G3 - Kappa"),
            ("embedUrl", embed),
            ("tags", "treehouse; architecture"),
            ("date", "2025-09-15"),
        ]
        .into_iter()
        .collect()
    }

    const EMBED: &str = "https://www.tinkercad.com/embed/abc";

    #[test]
    fn accepts_complete_rows_in_order() {
        let source = RosterSource::new(
            "kappa.csv",
            canonical_headers(),
            vec![row("a", "Treehouse", EMBED), row("b", "Bridge", EMBED)],
        );
        let out = ingest(&[source], &ShowcaseConfig::default());

        assert_eq!(out.report.accepted, 2);
        assert!(out.report.skipped.is_empty());
        assert!(out.report.warnings.is_empty());
        let ids: Vec<&str> = out.catalog.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(out.catalog.projects()[0].grade, "Grade 3");
        assert_eq!(out.catalog.classes().len(), 15);
    }

    #[test]
    fn incomplete_rows_are_skipped_with_reason() {
        let source = RosterSource::new(
            "kappa.csv",
            canonical_headers(),
            vec![row("a", "Treehouse", EMBED), row("b", "Bridge", "")],
        );
        let out = ingest(&[source], &ShowcaseConfig::default());

        assert_eq!(out.report.accepted, 1);
        assert_eq!(out.report.skipped.len(), 1);
        let skipped = &out.report.skipped[0];
        assert_eq!(skipped.row_number, 2);
        assert_eq!(skipped.reason, "incomplete row");
        assert_eq!(skipped.missing, vec!["embedUrl"]);
        assert_eq!(skipped.row.get("id"), "b");
    }

    #[test]
    fn malformed_embed_is_kept_with_warning() {
        let source = RosterSource::unchecked(
            "kappa.csv",
            vec![row("a", "Treehouse", "https://example.com/x")],
        );
        let out = ingest(&[source], &ShowcaseConfig::default());

        assert_eq!(out.report.accepted, 1);
        assert!(matches!(
            out.report.warnings.as_slice(),
            [IngestWarning::MalformedEmbedLink { id, .. }] if id == "a"
        ));
    }

    #[test]
    fn header_mismatch_warns_but_continues() {
        let headers = vec!["id".to_string(), "name".to_string()];
        let source = RosterSource::new("odd.csv", headers, vec![row("a", "T", EMBED)]);
        let out = ingest(&[source], &ShowcaseConfig::default());

        assert_eq!(out.report.accepted, 1);
        assert_eq!(out.report.warnings.len(), 1);
        assert_eq!(out.report.warnings[0].kind(), "unexpected_schema");
    }

    #[test]
    fn headerless_source_is_flagged() {
        let source = RosterSource::new("empty.csv", Vec::new(), Vec::new());
        let out = ingest(&[source], &ShowcaseConfig::default());

        assert_eq!(out.report.accepted, 0);
        match out.report.warnings.as_slice() {
            [IngestWarning::UnexpectedSchema { source, found, .. }] => {
                assert_eq!(source, "empty.csv");
                assert!(found.is_empty());
            }
            other => panic!("unexpected warnings: {other:?}"),
        }
    }

    #[test]
    fn unchecked_source_skips_schema_check() {
        let source = RosterSource::unchecked("mem", vec![row("a", "T", EMBED)]);
        let out = ingest(&[source], &ShowcaseConfig::default());
        assert!(out.report.warnings.is_empty());
    }

    #[test]
    fn duplicate_ids_are_kept_and_flagged() {
        let first = RosterSource::unchecked("a.csv", vec![row("dup", "One", EMBED)]);
        let second = RosterSource::unchecked("b.csv", vec![row("dup", "Two", EMBED)]);
        let out = ingest(&[first, second], &ShowcaseConfig::default());

        assert_eq!(out.report.accepted, 2);
        match out.report.warnings.as_slice() {
            [IngestWarning::DuplicateId {
                source,
                first_source,
                ..
            }] => {
                assert_eq!(source, "b.csv");
                assert_eq!(first_source, "a.csv");
            }
            other => panic!("unexpected warnings: {other:?}"),
        }
    }

    #[test]
    fn known_grade_fills_blank_grade() {
        let source = RosterSource::unchecked("x.csv", vec![row("a", "T", EMBED)])
            .with_known_grade("Grade 4");
        let out = ingest(&[source], &ShowcaseConfig::default());
        assert_eq!(out.catalog.projects()[0].grade, "Grade 4");
    }

    #[test]
    fn empty_input_yields_empty_catalog() {
        let out = ingest(&[], &ShowcaseConfig::default());
        assert!(out.catalog.is_empty());
        assert_eq!(out.report.summary(), "0 accepted, 0 skipped, 0 warnings");
    }

    #[test]
    fn header_check_is_exact() {
        assert!(headers_match(&canonical_headers()));
        let mut swapped = canonical_headers();
        swapped.swap(0, 1);
        assert!(!headers_match(&swapped));
        assert!(!headers_match(&canonical_headers()[..8]));
    }

    #[test]
    fn report_serializes_warning_kind() {
        let warning = IngestWarning::DuplicateId {
            source: "b.csv".into(),
            row_number: 3,
            id: "x".into(),
            first_source: "a.csv".into(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "duplicate_id");
        assert_eq!(json["row_number"], 3);
        assert!(warning.to_string().contains("first seen in a.csv"));
    }
}

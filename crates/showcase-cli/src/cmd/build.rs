use super::Workspace;
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::roster;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use showcase_core::ingest::Ingestor;
use showcase_core::model::today;
use showcase_core::slug::slugify;
use showcase_core::{Class, IngestReport, RosterSource};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Roster directory (default: `paths.rosters` from showcase.toml).
    #[arg(long)]
    pub rosters: Option<PathBuf>,

    /// Output snapshot path (default: `paths.dataset` from showcase.toml).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub dataset: String,
    pub sources: Vec<String>,
    pub projects: usize,
    #[serde(flatten)]
    pub report: IngestReport,
}

/// Execute `showcase build`: ingest every roster and write the snapshot.
///
/// # Errors
///
/// Returns an error if the roster directory is missing, a roster cannot be
/// read, or the snapshot cannot be written.
pub fn run_build(
    args: &BuildArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let ws = Workspace::load(project_root, config_path)?;
    let summary = build(args, &ws)?;

    render_mode(
        output,
        &summary,
        |s, w| {
            writeln!(w, "dataset\t{}", s.dataset)?;
            writeln!(w, "accepted\t{}", s.report.accepted)?;
            writeln!(w, "skipped\t{}", s.report.skipped.len())?;
            writeln!(w, "warnings\t{}", s.report.warnings.len())?;
            for warning in &s.report.warnings {
                writeln!(w, "warn\t{}\t{warning}", warning.kind())?;
            }
            for skipped in &s.report.skipped {
                writeln!(
                    w,
                    "skip\t{}\t{}\t{}",
                    skipped.source, skipped.row_number, skipped.reason
                )?;
            }
            Ok(())
        },
        |s, w| {
            pretty_section(w, &format!("✓ Wrote {} with {} projects", s.dataset, s.projects))?;
            pretty_kv(w, "Rosters", s.sources.len().to_string())?;
            pretty_kv(w, "Accepted", s.report.accepted.to_string())?;
            pretty_kv(w, "Skipped", s.report.skipped.len().to_string())?;
            pretty_kv(w, "Warnings", s.report.warnings.len().to_string())?;
            if !s.report.warnings.is_empty() || !s.report.skipped.is_empty() {
                pretty_rule(w)?;
            }
            for warning in &s.report.warnings {
                writeln!(w, "  warn: {warning}")?;
            }
            for skipped in &s.report.skipped {
                writeln!(
                    w,
                    "  skip: {} row {}: {} (missing {})",
                    skipped.source,
                    skipped.row_number,
                    skipped.reason,
                    skipped.missing.join(", ")
                )?;
            }
            Ok(())
        },
    )
}

/// Ingest the rosters and write the snapshot; no terminal output.
///
/// # Errors
///
/// See [`run_build`].
pub fn build(args: &BuildArgs, ws: &Workspace) -> Result<BuildSummary> {
    let rosters_dir = args
        .rosters
        .as_ref()
        .map_or_else(|| ws.rosters_dir(), |dir| ws.root.join(dir));
    let dataset_path = args
        .out
        .as_ref()
        .map_or_else(|| ws.dataset_path(), |path| ws.root.join(path));

    let sources = with_class_grades(roster::load_rosters(&rosters_dir)?, &ws.config.class_list());
    let ingestion = Ingestor::from_config(&ws.config).ingest(&sources);

    let dataset = ingestion
        .catalog
        .to_dataset(ws.config.snapshot_meta(&today()));
    roster::write_output(&dataset_path, &dataset.to_json_pretty()?)?;

    info!(
        dataset = %dataset_path.display(),
        report = %ingestion.report.summary(),
        "snapshot written"
    );

    Ok(BuildSummary {
        dataset: dataset_path.display().to_string(),
        sources: sources.iter().map(|s| s.name.clone()).collect(),
        projects: dataset.projects.len(),
        report: ingestion.report,
    })
}

/// Rosters named `<slug(class)>.csv` default blank grades to that class's grade.
fn with_class_grades(sources: Vec<RosterSource>, classes: &[Class]) -> Vec<RosterSource> {
    sources
        .into_iter()
        .map(|source| {
            let stem = Path::new(&source.name)
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            match classes.iter().find(|class| slugify(&class.name) == stem) {
                Some(class) => source.with_known_grade(class.grade.clone()),
                None => source,
            }
        })
        .collect()
}

//! `showcase parse-dump`: turn a pasted class page into a roster CSV.

use super::Workspace;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::roster;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use showcase_core::DumpParser;
use showcase_core::error::ShowcaseError;
use showcase_core::model::today;
use showcase_core::slug::slugify;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct ParseDumpArgs {
    /// Text file holding the pasted class page.
    pub input: PathBuf,

    /// Class the designs belong to (overrides `[dump] class_name`).
    #[arg(long = "class")]
    pub klass: Option<String>,

    /// Roster to write (default: `<rosters>/<class slug>.csv`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DumpSummary {
    roster: String,
    rows: usize,
}

/// Execute `showcase parse-dump`.
///
/// # Errors
///
/// Returns an error if the input is unreadable, a configured pattern is
/// invalid, or the roster cannot be written.
pub fn run_parse_dump(
    args: &ParseDumpArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut ws = Workspace::load(project_root, config_path)?;
    if let Some(klass) = &args.klass {
        ws.config.dump.class_name.clone_from(klass);
    }
    let summary = parse_dump(args, &ws)?;

    render_mode(
        output,
        &summary,
        |s, w| writeln!(w, "{}\t{}", s.roster, s.rows),
        |s, w| {
            pretty_section(w, &format!("✓ Wrote {}", s.roster))?;
            pretty_kv(w, "Rows", s.rows.to_string())?;
            writeln!(w)?;
            writeln!(w, "Next steps:")?;
            writeln!(w, "  Paste each student's embed link into the embedUrl column, then run:")?;
            writeln!(w, "    showcase build")
        },
    )
}

fn parse_dump(args: &ParseDumpArgs, ws: &Workspace) -> Result<DumpSummary> {
    let input = ws.root.join(&args.input);
    let text = fs::read_to_string(&input).map_err(|source| ShowcaseError::SourceUnreadable {
        path: input.clone(),
        source,
    })?;

    let parser = DumpParser::from_config(&ws.config)?;
    let rows = parser.parse(&text, &today());

    let out = args.out.as_ref().map_or_else(
        || {
            ws.rosters_dir()
                .join(format!("{}.csv", slugify(&ws.config.dump.class_name)))
        },
        |path| ws.root.join(path),
    );
    roster::write_roster(&out, &rows)?;
    info!(roster = %out.display(), rows = rows.len(), "dump parsed");

    Ok(DumpSummary {
        roster: out.display().to_string(),
        rows: rows.len(),
    })
}

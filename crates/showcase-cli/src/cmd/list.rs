//! `showcase list`: filtered, sorted project listing.

use super::{FilterArgs, Workspace};
use crate::output::{OutputMode, Renderable, render_list};
use anyhow::Result;
use clap::Args;
use showcase_core::Project;
use showcase_core::catalog::paginate;
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximum projects to show.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Skip this many projects before listing.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

/// One project as listed.
#[derive(Debug)]
pub struct ProjectRow<'a>(pub &'a Project);

impl Renderable for ProjectRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let p = self.0;
        writeln!(w, "{}  {} — {}", p.id, p.title, p.student)?;
        writeln!(w, "    {} • {}  {}", p.klass, p.grade, p.date)?;
        if !p.tags.is_empty() {
            writeln!(w, "    tags: {}", p.tags.join(", "))?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self.0)?;
        Ok(())
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let p = self.0;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            p.id, p.title, p.student, p.klass, p.grade, p.date
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "TITLE", "STUDENT", "CLASS", "GRADE", "DATE"]
    }
}

/// Execute `showcase list`.
///
/// # Errors
///
/// Returns an error if the snapshot is missing or the sort key is unknown.
pub fn run_list(
    args: &ListArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let query = args.filter.query_from_env()?;
    let ws = Workspace::load(project_root, config_path)?;
    let (catalog, _) = ws.load_catalog(args.filter.dataset.as_deref())?;

    let hits = catalog.query(&query);
    let rows: Vec<ProjectRow<'_>> = paginate(&hits, args.offset, args.limit)
        .iter()
        .copied()
        .map(ProjectRow)
        .collect();

    if rows.is_empty() && !output.is_json() {
        eprintln!("No projects match.");
        return Ok(());
    }
    render_list(&rows, output)?;
    Ok(())
}

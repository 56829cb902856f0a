//! `showcase classes`: class filter options for a grade.

use super::{GRADE_ENV, Workspace};
use crate::output::{OutputMode, Renderable, render_list};
use anyhow::Result;
use clap::Args;
use showcase_core::{Class, GradeFilter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct ClassesArgs {
    /// Grade label, or `All`. Defaults to `$SHOWCASE_GRADE`, then `All`.
    #[arg(short, long)]
    pub grade: Option<String>,

    /// Read this snapshot instead of the configured one.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ClassRow<'a>(pub &'a Class);

impl Renderable for ClassRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let c = self.0;
        writeln!(w, "{:<24} {:<14} {:>4}  {}", c.name, c.grade, c.count, c.created)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self.0)?;
        Ok(())
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let c = self.0;
        writeln!(w, "{}\t{}\t{}\t{}", c.name, c.grade, c.count, c.created)
    }

    fn table_headers() -> &'static [&'static str] {
        &["NAME", "GRADE", "COUNT", "CREATED"]
    }
}

/// Execute `showcase classes`.
///
/// # Errors
///
/// Returns an error if the snapshot is missing or unreadable.
pub fn run_classes(
    args: &ClassesArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let ws = Workspace::load(project_root, config_path)?;
    let (catalog, _) = ws.load_catalog(args.dataset.as_deref())?;

    let env_grade = std::env::var(GRADE_ENV).ok();
    let grade = GradeFilter::from(
        args.grade
            .as_deref()
            .or(env_grade.as_deref())
            .unwrap_or_default(),
    );

    let rows: Vec<ClassRow<'_>> = catalog
        .list_classes(&grade)
        .into_iter()
        .map(ClassRow)
        .collect();
    render_list(&rows, output)?;
    Ok(())
}

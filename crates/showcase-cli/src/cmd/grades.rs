//! `showcase grades`: grade filter options.

use super::Workspace;
use crate::output::{OutputMode, render_mode};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct GradesArgs {
    /// Read this snapshot instead of the configured one.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

/// Execute `showcase grades`.
///
/// # Errors
///
/// Returns an error if the snapshot is missing or unreadable.
pub fn run_grades(
    args: &GradesArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let ws = Workspace::load(project_root, config_path)?;
    let (catalog, _) = ws.load_catalog(args.dataset.as_deref())?;
    let grades = catalog.list_grades();

    render_mode(
        output,
        &grades,
        |grades, w| {
            for grade in grades {
                writeln!(w, "{grade}")?;
            }
            Ok(())
        },
        |grades, w| {
            for grade in grades {
                let count = catalog
                    .list_classes(&grade.as_str().into())
                    .len();
                writeln!(w, "{grade:<14} {count} classes")?;
            }
            Ok(())
        },
    )
}

//! `showcase present`: interactive slideshow.

use super::{FilterArgs, Workspace};
use crate::tui::present::{PresentView, run_present};
use anyhow::Result;
use clap::Args;
use showcase_core::{Navigator, Project};
use std::path::Path;
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug)]
pub struct PresentArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Index of the first slide (wraps around).
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Start with autoplay on.
    #[arg(long)]
    pub autoplay: bool,

    /// Autoplay interval in milliseconds (default: `autoplayMs` from the snapshot).
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Build an opened navigator for the slideshow, or `None` when nothing matches.
pub fn open_navigator(
    projects: Vec<Project>,
    args: &PresentArgs,
    autoplay_ms: u64,
    now: Instant,
) -> Option<Navigator> {
    let mut nav = Navigator::with_autoplay_ms(projects, args.interval_ms.unwrap_or(autoplay_ms));
    nav.open(args.start)?;
    if args.autoplay {
        nav.toggle_autoplay(now);
    }
    Some(nav)
}

/// Execute `showcase present`.
///
/// # Errors
///
/// Returns an error if the snapshot is missing, the sort key is unknown, or
/// the terminal cannot be driven.
pub fn run(args: &PresentArgs, project_root: &Path, config_path: Option<&Path>) -> Result<()> {
    let query = args.filter.query_from_env()?;
    let ws = Workspace::load(project_root, config_path)?;
    let (catalog, dataset) = ws.load_catalog(args.filter.dataset.as_deref())?;

    let projects: Vec<Project> = catalog.query(&query).into_iter().cloned().collect();
    let Some(nav) = open_navigator(projects, args, dataset.meta.autoplay_ms, Instant::now()) else {
        eprintln!("No projects match; nothing to present.");
        return Ok(());
    };

    info!(slides = nav.len(), "starting slideshow");
    let title = if dataset.meta.title.is_empty() {
        ws.config.meta.title.clone()
    } else {
        dataset.meta.title
    };
    run_present(PresentView::new(nav, title))
}

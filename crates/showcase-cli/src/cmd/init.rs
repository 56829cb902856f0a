use super::Workspace;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::roster;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use showcase_core::canonical::RawRow;
use showcase_core::error::ShowcaseError;
use showcase_core::model::today;
use showcase_core::slug::slugify;
use showcase_core::{Catalog, Class, Project};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Seed this many placeholder projects per class into projects.json.
    #[arg(long, default_value_t = 0)]
    pub seed: usize,

    /// Overwrite an existing projects.json. Filled rosters are never touched.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    root: String,
    dataset: String,
    rosters_created: Vec<String>,
    rosters_kept: Vec<String>,
    seeded_projects: usize,
}

const PLACEHOLDER_EMBED: &str = "https://www.tinkercad.com/embed/XXXXXXXXX?autostart=true";

fn example_row(class: &Class, date: &str) -> RawRow {
    let id = format!("{}-example-1", slugify(&class.name));
    [
        ("id", id.as_str()),
        ("title", "Treehouse 01"),
        ("student", "Ava G."),
        ("klass", class.name.as_str()),
        ("grade", class.grade.as_str()),
        ("thumbnail", ""),
        ("embedUrl", PLACEHOLDER_EMBED),
        ("tags", "treehouse;architecture"),
        ("date", date),
    ]
    .into_iter()
    .collect()
}

fn placeholder_projects(classes: &[Class], per_class: usize, date: &str) -> Vec<Project> {
    classes
        .iter()
        .flat_map(|class| {
            (1..=per_class).map(move |i| Project {
                id: format!("{}-placeholder-{i}", slugify(&class.name)),
                title: format!("Project {i}"),
                student: format!("Student {i}"),
                klass: class.name.clone(),
                grade: class.grade.clone(),
                thumbnail: String::new(),
                embed_url: PLACEHOLDER_EMBED.to_string(),
                tags: vec!["placeholder".to_string()],
                date: date.to_string(),
            })
        })
        .collect()
}

/// Execute `showcase init`. Creates the scaffold:
///
/// ```text
/// showcase/
///   data/
///   images/          (thumbnails)
///   rosters/
///     <class>.csv    (one template per configured class)
///   projects.json    (meta + classes, optional placeholders)
/// ```
///
/// # Errors
///
/// Returns an error if `projects.json` exists and `--force` is not set, or
/// if any filesystem operation fails.
pub fn run_init(
    args: &InitArgs,
    output: OutputMode,
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let ws = Workspace::load(project_root, config_path)?;
    let report = scaffold(args, &ws)?;

    render_mode(
        output,
        &report,
        |r, w| {
            writeln!(w, "root\t{}", r.root)?;
            writeln!(w, "dataset\t{}", r.dataset)?;
            writeln!(w, "rosters_created\t{}", r.rosters_created.len())?;
            writeln!(w, "rosters_kept\t{}", r.rosters_kept.len())?;
            writeln!(w, "seeded_projects\t{}", r.seeded_projects)
        },
        |r, w| {
            pretty_section(w, "✓ Initialized showcase scaffold")?;
            pretty_kv(w, "Root", &r.root)?;
            pretty_kv(w, "Dataset", &r.dataset)?;
            pretty_kv(w, "Rosters", format!("{} created, {} kept", r.rosters_created.len(), r.rosters_kept.len()))?;
            if r.seeded_projects > 0 {
                pretty_kv(w, "Seeded", format!("{} placeholder projects", r.seeded_projects))?;
            }
            writeln!(w)?;
            writeln!(w, "Next steps:")?;
            writeln!(w, "  Fill the roster CSVs with each student's embed link, then run:")?;
            writeln!(w, "    showcase build")
        },
    )
}

fn scaffold(args: &InitArgs, ws: &Workspace) -> Result<InitReport> {
    let paths = &ws.config.paths;
    let root_dir = paths.root_in(&ws.root);
    let rosters_dir = paths.rosters_in(&ws.root);
    let dataset_path = paths.dataset_in(&ws.root);

    if dataset_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use `showcase init --force` to rewrite it.",
            dataset_path.display()
        );
    }

    for dir in [
        root_dir.clone(),
        root_dir.join("data"),
        rosters_dir.clone(),
        paths.images_in(&ws.root),
    ] {
        fs::create_dir_all(&dir).map_err(|source| ShowcaseError::OutputWrite {
            path: dir.clone(),
            source,
        })?;
    }

    let date = today();
    let classes = ws.config.class_list();

    let mut rosters_created = Vec::new();
    let mut rosters_kept = Vec::new();
    for class in &classes {
        let file_name = format!("{}.csv", slugify(&class.name));
        let path = rosters_dir.join(&file_name);
        if path.exists() {
            rosters_kept.push(file_name);
            continue;
        }
        roster::write_roster(&path, &[example_row(class, &date)])?;
        rosters_created.push(file_name);
    }

    let projects = placeholder_projects(&classes, args.seed, &date);
    let seeded_projects = projects.len();
    let dataset = Catalog::new(projects, classes).to_dataset(ws.config.snapshot_meta(&date));
    roster::write_output(&dataset_path, &dataset.to_json_pretty()?)?;

    info!(
        created = rosters_created.len(),
        kept = rosters_kept.len(),
        seeded = seeded_projects,
        "scaffold written"
    );

    Ok(InitReport {
        root: root_dir.display().to_string(),
        dataset: dataset_path.display().to_string(),
        rosters_created,
        rosters_kept,
        seeded_projects,
    })
}

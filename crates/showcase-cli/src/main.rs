#![forbid(unsafe_code)]

mod cmd;
mod output;
mod roster;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "showcase: build and present a student project showcase",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Use this config file instead of `./showcase.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self, user_default: Option<&str>) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, user_default)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Create the showcase scaffold",
        long_about = "Create the showcase directories, one roster template per configured class, and an initial projects.json.",
        after_help = "EXAMPLES:\n    # Create the scaffold\n    showcase init\n\n    # Also seed two placeholder projects per class\n    showcase init --seed 2"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Build projects.json from rosters",
        long_about = "Ingest every roster CSV, report skipped rows and warnings, and write the snapshot.",
        after_help = "EXAMPLES:\n    # Build with configured paths\n    showcase build\n\n    # Emit machine-readable report\n    showcase build --json"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Turn a pasted class page into a roster",
        long_about = "Recover (title, username) pairs from a pasted class page and write them as a roster CSV with blank embed links.",
        after_help = "EXAMPLES:\n    # Parse the default class\n    showcase parse-dump raw_kappa.txt\n\n    # Parse for another class\n    showcase parse-dump raw.txt --class \"RM224 - G3 - Iota\""
    )]
    ParseDump(cmd::parse_dump::ParseDumpArgs),

    #[command(
        next_help_heading = "Read",
        about = "List projects",
        long_about = "List projects filtered by grade, class and search text, in the chosen order.",
        after_help = "EXAMPLES:\n    # Newest first (default)\n    showcase list\n\n    # One class, alphabetical by title\n    showcase list --class \"RM225 - G3 - Kappa\" --sort title-asc\n\n    # Search\n    showcase list --search rocket --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "List grade filter options"
    )]
    Grades(cmd::grades::GradesArgs),

    #[command(
        next_help_heading = "Read",
        about = "List classes for a grade",
        after_help = "EXAMPLES:\n    showcase classes --grade \"Grade 3\""
    )]
    Classes(cmd::classes::ClassesArgs),

    #[command(
        next_help_heading = "Present",
        about = "Run the full-screen slideshow",
        long_about = "Present the filtered projects one at a time. ←/→ navigate, space toggles autoplay, Esc or q closes.",
        after_help = "EXAMPLES:\n    # Present one grade with autoplay\n    showcase present --grade \"Grade 3\" --autoplay"
    )]
    Present(cmd::present::PresentArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    showcase completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHOWCASE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "showcase=debug,info"
        } else {
            "showcase=info,warn"
        })
    });

    let format = env::var("SHOWCASE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let user_config = showcase_core::config::load_user_config().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable user config");
        showcase_core::config::UserConfig::default()
    });
    let output = cli.output_mode(user_config.output.as_deref());

    let result = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|project_root| dispatch(&cli, output, &project_root));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = output::render_error(output, &CliError::from_anyhow(&err));
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli, output: OutputMode, project_root: &std::path::Path) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, project_root, config),
        Commands::Build(args) => cmd::build::run_build(args, output, project_root, config),
        Commands::ParseDump(args) => {
            cmd::parse_dump::run_parse_dump(args, output, project_root, config)
        }
        Commands::List(args) => cmd::list::run_list(args, output, project_root, config),
        Commands::Grades(args) => cmd::grades::run_grades(args, output, project_root, config),
        Commands::Classes(args) => cmd::classes::run_classes(args, output, project_root, config),
        Commands::Present(args) => cmd::present::run(args, project_root, config),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

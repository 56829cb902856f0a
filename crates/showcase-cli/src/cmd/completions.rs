//! `showcase completions`: shell completion scripts.

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

pub const BIN_NAME: &str = "showcase";

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, BIN_NAME, out);
}

/// Print the completion script to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, command, &mut out);
    out.flush()?;
    Ok(())
}

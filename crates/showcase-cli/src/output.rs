//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for people, compact text for scripts and pipes,
//! or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the user config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use serde::Serialize;
use showcase_core::error::ShowcaseError;
use std::io::{self, IsTerminal, Write};

/// Shared width for pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in pretty output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Tab-separated plain text for pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn parse_name(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    user_default: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::parse_name) {
        return mode;
    }
    if let Some(mode) = user_default.and_then(OutputMode::parse_name) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, user config and TTY.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    user_default: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        user_default,
        is_tty,
    )
}

/// Implemented by any CLI result type that renders in all modes.
pub trait Renderable {
    /// Render for people: labels, alignment.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as one self-contained JSON value.
    fn render_json(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as a single text row, fields in [`Renderable::table_headers`] order.
    fn render_table(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Column headers for text mode. Default: none.
    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Render a list of [`Renderable`] items into `out`.
///
/// JSON mode wraps items in an array; pretty/text render sequentially.
pub fn write_list<R: Renderable>(
    out: &mut dyn Write,
    items: &[R],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Pretty => {
            for item in items {
                item.render_human(out)?;
            }
        }
        OutputMode::Text => {
            let headers = if items.is_empty() {
                &[] as &[&str]
            } else {
                R::table_headers()
            };
            if !headers.is_empty() {
                writeln!(out, "{}", headers.join("\t"))?;
            }
            for item in items {
                item.render_table(out)?;
            }
        }
        OutputMode::Json => {
            write!(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(out, ",")?;
                }
                writeln!(out)?;
                let mut buf = Vec::new();
                item.render_json(&mut buf)?;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                out.write_all(&buf)?;
            }
            writeln!(out, "\n]")?;
        }
    }
    Ok(())
}

/// Render a list of [`Renderable`] items to stdout.
pub fn render_list<R: Renderable>(items: &[R], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_list(&mut out, items, mode)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Build from any `anyhow` error, keeping code and hint when a
    /// [`ShowcaseError`] sits anywhere in the chain.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<ShowcaseError>())
            .map_or_else(
                || Self::new(format!("{err:#}")),
                |typed| Self {
                    message: format!("{err:#}"),
                    ..Self::from(typed)
                },
            )
    }
}

impl From<&ShowcaseError> for CliError {
    fn from(err: &ShowcaseError) -> Self {
        Self {
            message: err.to_string(),
            suggestion: Some(err.suggestion()),
            error_code: Some(err.error_code().to_string()),
        }
    }
}

/// Write an error in the requested format.
pub fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(&mut out, mode, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_beats_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_beats_user_config() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_user_config_beats_tty_default() {
        let mode = resolve_output_mode_inner(None, false, None, Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_unknown_values_fall_through() {
        let mode = resolve_output_mode_inner(None, false, Some("yaml"), Some("xml"), false);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_default_tty_is_pretty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
    }

    // ── Renderable / write_list ─────────────────────────────────────────────

    struct SimpleItem {
        name: String,
        count: u32,
    }

    impl Renderable for SimpleItem {
        fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}: {}", self.name, self.count)
        }

        fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
            write!(
                w,
                "{{\"name\":{},\"count\":{}}}",
                serde_json::to_string(&self.name).unwrap(),
                self.count
            )
        }

        fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}\t{}", self.name, self.count)
        }

        fn table_headers() -> &'static [&'static str] {
            &["NAME", "COUNT"]
        }
    }

    fn items() -> Vec<SimpleItem> {
        vec![
            SimpleItem {
                name: "a".into(),
                count: 1,
            },
            SimpleItem {
                name: "b".into(),
                count: 2,
            },
        ]
    }

    #[test]
    fn list_text_has_header_row() {
        let mut buf = Vec::new();
        write_list(&mut buf, &items(), OutputMode::Text).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "NAME\tCOUNT\na\t1\nb\t2\n");
    }

    #[test]
    fn list_json_is_valid_array() {
        let mut buf = Vec::new();
        write_list(&mut buf, &items(), OutputMode::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["name"], "b");
    }

    #[test]
    fn list_json_empty() {
        let mut buf = Vec::new();
        write_list::<SimpleItem>(&mut buf, &[], OutputMode::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value.as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn empty_text_list_has_no_header() {
        let mut buf = Vec::new();
        write_list::<SimpleItem>(&mut buf, &[], OutputMode::Text).unwrap();
        assert!(buf.is_empty());
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_from_showcase_error() {
        let err = ShowcaseError::RostersMissing(PathBuf::from("showcase/rosters"));
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1004"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn cli_error_from_anyhow_finds_typed_cause() {
        let err = anyhow::Error::new(ShowcaseError::InvalidSortKey("newest".into()))
            .context("list failed");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.message.starts_with("list failed"));
    }

    #[test]
    fn cli_error_from_plain_anyhow() {
        let cli = CliError::from_anyhow(&anyhow::anyhow!("boom"));
        assert_eq!(cli.message, "boom");
        assert!(cli.error_code.is_none());
    }

    #[test]
    fn write_error_json_wraps_error() {
        let mut buf = Vec::new();
        let err = CliError::new("bad input");
        write_error(&mut buf, OutputMode::Json, &err).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error"]["message"], "bad input");
        assert!(value["error"].get("suggestion").is_none());
    }

    #[test]
    fn write_error_human_includes_code_and_suggestion() {
        let mut buf = Vec::new();
        let err = CliError::from(&ShowcaseError::DatasetMissing(PathBuf::from("x.json")));
        write_error(&mut buf, OutputMode::Pretty, &err).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("error[E1003]: dataset not found: x.json"));
        assert!(s.contains("suggestion: Run `showcase build`"));
    }

    #[test]
    fn pretty_kv_aligns() {
        let mut buf = Vec::new();
        pretty_kv(&mut buf, "Accepted", "3").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Accepted:    3\n");
    }
}

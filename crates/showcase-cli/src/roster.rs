//! CSV roster files: one header row, then one project per row.

use anyhow::{Context as _, Result};
use showcase_core::canonical::{ROSTER_HEADERS, RawRow};
use showcase_core::error::ShowcaseError;
use showcase_core::ingest::RosterSource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decode a roster from any reader. Short rows leave trailing columns empty;
/// cells past the header are ignored. An empty input yields a source with an
/// empty header row, which ingestion reports as an unexpected schema.
///
/// # Errors
///
/// Returns [`ShowcaseError::Csv`] if the input is not decodable CSV.
pub fn read_roster_from<R: io::Read>(name: &str, reader: R) -> Result<RosterSource, ShowcaseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|err| ShowcaseError::Csv(format!("{name}: {err}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|err| ShowcaseError::Csv(format!("{name}: {err}")))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.as_str(), cell))
            .collect();
        rows.push(row);
    }

    Ok(RosterSource::new(name, headers, rows))
}

/// Read one roster file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn read_roster(path: &Path) -> Result<RosterSource> {
    let file = fs::File::open(path).map_err(|source| ShowcaseError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let source = read_roster_from(&name, io::BufReader::new(file))?;
    debug!(roster = %name, rows = source.rows.len(), "read roster");
    Ok(source)
}

/// `*.csv` files directly under `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`ShowcaseError::RostersMissing`] if `dir` is not a directory.
pub fn roster_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ShowcaseError::RostersMissing(dir.to_path_buf()).into());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Read every roster under `dir` in sorted order.
///
/// # Errors
///
/// Returns an error if the directory is missing or any roster is unreadable.
pub fn load_rosters(dir: &Path) -> Result<Vec<RosterSource>> {
    roster_files(dir)?
        .iter()
        .map(|path| read_roster(path))
        .collect()
}

/// Encode rows under the canonical header.
///
/// # Errors
///
/// Returns [`ShowcaseError::Csv`] if encoding fails.
pub fn write_roster_to<W: io::Write>(writer: W, rows: &[RawRow]) -> Result<(), ShowcaseError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let to_err = |err: csv::Error| ShowcaseError::Csv(err.to_string());

    csv_writer.write_record(ROSTER_HEADERS).map_err(to_err)?;
    for row in rows {
        csv_writer.write_record(row.to_record()).map_err(to_err)?;
    }
    csv_writer
        .flush()
        .map_err(|err| ShowcaseError::Csv(err.to_string()))
}

/// Write a roster file, creating parent directories and replacing any
/// existing file.
///
/// # Errors
///
/// Returns [`ShowcaseError::OutputWrite`] if the file cannot be created, or
/// [`ShowcaseError::Csv`] if encoding fails.
pub fn write_roster(path: &Path, rows: &[RawRow]) -> Result<(), ShowcaseError> {
    let output_err = |source| ShowcaseError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    let file = fs::File::create(path).map_err(output_err)?;
    write_roster_to(io::BufWriter::new(file), rows)
}

/// Write a generated file (the snapshot), creating parent directories.
///
/// # Errors
///
/// Returns [`ShowcaseError::OutputWrite`] on any filesystem failure.
pub fn write_output(path: &Path, contents: &str) -> Result<(), ShowcaseError> {
    let output_err = |source| ShowcaseError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    fs::write(path, contents).map_err(output_err)
}

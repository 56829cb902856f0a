use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidPattern,
    DatasetMissing,
    RostersMissing,
    InvalidSortKey,
    SourceUnreadable,
    CsvDecodeFailed,
    DatasetCorrupt,
    OutputWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidPattern => "E1002",
            Self::DatasetMissing => "E1003",
            Self::RostersMissing => "E1004",
            Self::InvalidSortKey => "E2001",
            Self::SourceUnreadable => "E3001",
            Self::CsvDecodeFailed => "E3002",
            Self::DatasetCorrupt => "E3003",
            Self::OutputWriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidPattern => "Invalid regex pattern in config",
            Self::DatasetMissing => "Dataset file not found",
            Self::RostersMissing => "Rosters directory not found",
            Self::InvalidSortKey => "Invalid sort key",
            Self::SourceUnreadable => "Roster source unreadable",
            Self::CsvDecodeFailed => "Roster CSV decode failed",
            Self::DatasetCorrupt => "Dataset file is not a valid snapshot",
            Self::OutputWriteFailed => "Output write failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in showcase.toml and retry."),
            Self::InvalidPattern => {
                Some("Check [[keyword_rules]] patterns and [dump] user_pattern.")
            }
            Self::DatasetMissing => Some("Run `showcase build` to generate projects.json."),
            Self::RostersMissing => Some("Run `showcase init` to create roster templates."),
            Self::InvalidSortKey => {
                Some("Use one of date-desc, date-asc, title-asc, student-asc.")
            }
            Self::SourceUnreadable => Some("Check the file exists and is readable."),
            Self::CsvDecodeFailed => Some("Save the roster as UTF-8 CSV with a header row."),
            Self::DatasetCorrupt => Some("Rebuild the dataset with `showcase build`."),
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Fatal failures. Per-row problems are reported through
/// [`crate::ingest::IngestReport`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    #[error("failed to parse config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("dataset not found: {0}")]
    DatasetMissing(PathBuf),

    #[error("rosters directory not found: {0}")]
    RostersMissing(PathBuf),

    #[error("unknown sort key '{0}'")]
    InvalidSortKey(String),

    #[error("cannot read {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV decode failed: {0}")]
    Csv(String),

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShowcaseError {
    /// The stable code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            Self::DatasetMissing(_) => ErrorCode::DatasetMissing,
            Self::RostersMissing(_) => ErrorCode::RostersMissing,
            Self::InvalidSortKey(_) => ErrorCode::InvalidSortKey,
            Self::SourceUnreadable { .. } => ErrorCode::SourceUnreadable,
            Self::Csv(_) => ErrorCode::CsvDecodeFailed,
            Self::Json(_) => ErrorCode::DatasetCorrupt,
            Self::OutputWrite { .. } => ErrorCode::OutputWriteFailed,
        }
    }

    /// Remediation text for terminal and JSON error output.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or_else(|| self.error_code().message())
            .to_string()
    }
}

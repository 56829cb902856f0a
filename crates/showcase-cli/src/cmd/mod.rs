pub mod build;
pub mod classes;
pub mod completions;
pub mod grades;
pub mod init;
pub mod list;
pub mod parse_dump;
pub mod present;

use anyhow::{Context as _, Result};
use clap::Args;
use showcase_core::config::{self, ShowcaseConfig};
use showcase_core::error::ShowcaseError;
use showcase_core::{Catalog, Dataset, Query, SortKey};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable supplying the default grade filter.
pub const GRADE_ENV: &str = "SHOWCASE_GRADE";

/// Project root plus its loaded configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: ShowcaseConfig,
}

impl Workspace {
    /// Load `showcase.toml` from `root`, or from `config_path` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => config::load_config_file(path)?,
            None => config::load_config(root)?,
        };
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn rosters_dir(&self) -> PathBuf {
        self.config.paths.rosters_in(&self.root)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.config.paths.dataset_in(&self.root)
    }

    /// Read the exported snapshot, at `override_path` or the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError::DatasetMissing`] if the file does not exist,
    /// or [`ShowcaseError::Json`] if it is not a snapshot document.
    pub fn load_dataset(&self, override_path: Option<&Path>) -> Result<Dataset> {
        let path = override_path.map_or_else(|| self.dataset_path(), Path::to_path_buf);
        if !path.is_file() {
            return Err(ShowcaseError::DatasetMissing(path).into());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let dataset = Dataset::from_json(&text)
            .map_err(ShowcaseError::from)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        debug!(path = %path.display(), projects = dataset.projects.len(), "loaded dataset");
        Ok(dataset)
    }

    /// Catalog rebuilt from the snapshot.
    ///
    /// # Errors
    ///
    /// See [`Workspace::load_dataset`].
    pub fn load_catalog(&self, override_path: Option<&Path>) -> Result<(Catalog, Dataset)> {
        let dataset = self.load_dataset(override_path)?;
        Ok((Catalog::from_dataset(dataset.clone()), dataset))
    }
}

/// Grade/class/search/sort options shared by `list` and `present`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Grade label, or `All`. Defaults to `$SHOWCASE_GRADE`, then `All`.
    #[arg(short, long)]
    pub grade: Option<String>,

    /// Exact class name.
    #[arg(short, long = "class")]
    pub klass: Option<String>,

    /// Case-insensitive text matched against title, student, tags and class.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order: date-desc, date-asc, title-asc, student-asc.
    #[arg(long, default_value = "date-desc")]
    pub sort: String,

    /// Read this snapshot instead of the configured one.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
}

impl FilterArgs {
    /// Build the catalog query, resolving the grade default from `env_grade`.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError::InvalidSortKey`] for an unknown sort key.
    pub fn to_query(&self, env_grade: Option<&str>) -> Result<Query, ShowcaseError> {
        let sort: SortKey = self.sort.parse()?;
        let grade = self.grade.as_deref().or(env_grade).unwrap_or_default();
        Ok(Query::new()
            .grade(grade)
            .class(self.klass.as_deref().unwrap_or_default())
            .search(self.search.clone().unwrap_or_default())
            .sort(sort))
    }

    /// [`FilterArgs::to_query`] with the grade default read from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError::InvalidSortKey`] for an unknown sort key.
    pub fn query_from_env(&self) -> Result<Query, ShowcaseError> {
        let env_grade = std::env::var(GRADE_ENV).ok();
        self.to_query(env_grade.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::{ClassFilter, GradeFilter};
    use tempfile::TempDir;

    #[test]
    fn explicit_grade_beats_env() {
        let args = FilterArgs {
            grade: Some("Grade 3".into()),
            sort: "date-desc".into(),
            ..FilterArgs::default()
        };
        let query = args.to_query(Some("Grade 5")).unwrap();
        assert_eq!(query.grade, GradeFilter::Only("Grade 3".into()));
    }

    #[test]
    fn env_grade_is_default() {
        let args = FilterArgs {
            sort: "title-asc".into(),
            ..FilterArgs::default()
        };
        let query = args.to_query(Some("Grade 5")).unwrap();
        assert_eq!(query.grade, GradeFilter::Only("Grade 5".into()));
        assert_eq!(query.class, ClassFilter::All);
        assert_eq!(query.sort, SortKey::TitleAsc);

        let query = args.to_query(None).unwrap();
        assert_eq!(query.grade, GradeFilter::All);
    }

    #[test]
    fn bad_sort_is_typed_error() {
        let args = FilterArgs {
            sort: "newest".into(),
            ..FilterArgs::default()
        };
        assert!(matches!(
            args.to_query(None),
            Err(ShowcaseError::InvalidSortKey(_))
        ));
    }

    #[test]
    fn missing_dataset_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::load(dir.path(), None).unwrap();
        let err = ws.load_dataset(None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ShowcaseError>(),
            Some(ShowcaseError::DatasetMissing(_))
        ));
    }

    #[test]
    fn corrupt_dataset_is_typed_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "{ not json").unwrap();
        let ws = Workspace::load(dir.path(), None).unwrap();
        let err = ws.load_dataset(Some(&path)).unwrap_err();
        let typed = err.downcast_ref::<ShowcaseError>().expect("typed cause");
        assert_eq!(typed.error_code().code(), "E3003");
    }
}

//! In-memory project catalog: grade/class listings and filtered, sorted
//! queries.
//!
//! A [`Catalog`] is immutable once built. Each project's search haystack is
//! computed at construction, so a query is a linear scan plus one stable
//! sort.

use crate::error::ShowcaseError;
use crate::model::{Class, Dataset, Meta, Project};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Grade filter value meaning "every grade".
pub const ALL_GRADES: &str = "All";
/// Class filter value meaning "every class".
pub const ALL_CLASSES: &str = "__ALL__";

// ---------------------------------------------------------------------------
// Filters and sort keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GradeFilter {
    #[default]
    All,
    Only(String),
}

impl GradeFilter {
    fn matches(&self, grade: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == grade,
        }
    }
}

impl From<&str> for GradeFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_GRADES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl fmt::Display for GradeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_GRADES),
            Self::Only(grade) => f.write_str(grade),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassFilter {
    #[default]
    All,
    Only(String),
}

impl ClassFilter {
    fn matches(&self, klass: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == klass,
        }
    }
}

impl From<&str> for ClassFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CLASSES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CLASSES),
            Self::Only(klass) => f.write_str(klass),
        }
    }
}

/// Result ordering. All sorts are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    DateAsc,
    /// Newest first.
    #[default]
    DateDesc,
    TitleAsc,
    StudentAsc,
}

impl SortKey {
    pub const ALL: [Self; 4] = [
        Self::DateDesc,
        Self::DateAsc,
        Self::TitleAsc,
        Self::StudentAsc,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::TitleAsc => "title-asc",
            Self::StudentAsc => "student-asc",
        }
    }

    fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            Self::DateAsc => a.date.cmp(&b.date),
            Self::DateDesc => b.date.cmp(&a.date),
            Self::TitleAsc => locale_cmp(&a.title, &b.title),
            Self::StudentAsc => locale_cmp(&a.student, &b.student),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShowcaseError::InvalidSortKey(s.to_string()))
    }
}

/// Accent- and case-insensitive primary key: NFD decomposition with the
/// combining marks dropped, then lowercased.
fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collation for display names. Base letters decide first, so `Éclair`
/// sits between `apple` and `Zebra`. Ties fall back to the lowercased text
/// (unaccented before accented), then lowercase before uppercase.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// One catalog query. The default matches everything, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub grade: GradeFilter,
    pub class: ClassFilter,
    /// Case-insensitive substring; blank matches everything.
    pub search: String,
    pub sort: SortKey,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn grade(mut self, grade: impl Into<GradeFilter>) -> Self {
        self.grade = grade.into();
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<ClassFilter>) -> Self {
        self.class = class.into();
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
    haystacks: Vec<String>,
    classes: Vec<Class>,
}

impl Catalog {
    /// Build a catalog; project order is kept as the base order for sorts.
    #[must_use]
    pub fn new(projects: Vec<Project>, classes: Vec<Class>) -> Self {
        let haystacks = projects.iter().map(Project::search_text).collect();
        Self {
            projects,
            haystacks,
            classes,
        }
    }

    /// Rebuild a catalog from an exported snapshot.
    ///
    /// A hand-edited snapshot can hold rows the canonicalizer would have
    /// rejected; rows with a blank required field are dropped with a warning.
    #[must_use]
    pub fn from_dataset(dataset: Dataset) -> Self {
        let projects = dataset
            .projects
            .into_iter()
            .filter(|project| {
                let missing = project.missing_fields();
                if missing.is_empty() {
                    return true;
                }
                warn!(
                    id = %project.id,
                    title = %project.title,
                    ?missing,
                    "dropping snapshot project with blank required fields"
                );
                false
            })
            .collect();
        Self::new(projects, dataset.classes)
    }

    /// Export as a snapshot with the given metadata.
    #[must_use]
    pub fn to_dataset(&self, meta: Meta) -> Dataset {
        Dataset {
            meta,
            classes: self.classes.clone(),
            projects: self.projects.clone(),
        }
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// `"All"` followed by the distinct class grades in ascending order.
    #[must_use]
    pub fn list_grades(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .classes
            .iter()
            .map(|class| class.grade.as_str())
            .filter(|grade| *grade != ALL_GRADES)
            .collect();

        std::iter::once(ALL_GRADES)
            .chain(distinct)
            .map(str::to_string)
            .collect()
    }

    /// Classes whose grade passes `grade`, in roster order.
    #[must_use]
    pub fn list_classes(&self, grade: &GradeFilter) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|class| grade.matches(&class.grade))
            .collect()
    }

    /// Filter by grade, class and search text, then stable-sort.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<&Project> {
        let needle = query.search.trim().to_lowercase();

        let mut hits: Vec<&Project> = self
            .projects
            .iter()
            .zip(&self.haystacks)
            .filter(|(project, haystack)| {
                query.grade.matches(&project.grade)
                    && query.class.matches(&project.klass)
                    && (needle.is_empty() || haystack.contains(&needle))
            })
            .map(|(project, _)| project)
            .collect();

        hits.sort_by(|a, b| query.sort.compare(a, b));
        hits
    }
}

/// Slice out one page of results.
#[must_use]
pub fn paginate<T>(items: &[T], offset: usize, limit: Option<usize>) -> &[T] {
    let start = offset.min(items.len());
    let end = limit.map_or(items.len(), |limit| {
        start.saturating_add(limit).min(items.len())
    });
    &items[start..end]
}

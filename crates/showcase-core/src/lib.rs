//! showcase-core library.
//!
//! Turns loosely-filled roster rows into a canonical project catalog and
//! serves grade/class/text queries and slideshow navigation over it.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` at I/O boundaries, [`error::ShowcaseError`]
//!   for typed failures. Per-row problems are reported, never raised.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod canonical;
pub mod catalog;
pub mod config;
pub mod dump;
pub mod error;
pub mod grade;
pub mod ingest;
pub mod model;
pub mod navigator;
pub mod slug;

pub use catalog::{Catalog, ClassFilter, GradeFilter, Query, SortKey};
pub use config::ShowcaseConfig;
pub use dump::DumpParser;
pub use error::ShowcaseError;
pub use ingest::{IngestReport, Ingestion, RosterSource, ingest};
pub use model::{Class, Dataset, Meta, Project};
pub use navigator::{NavState, Navigator, Slide};

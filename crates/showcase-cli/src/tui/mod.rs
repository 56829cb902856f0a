//! Terminal user interface (TUI) for showcase.
//!
//! ## Entry points
//!
//! - [`present::run_present`]: full-screen slideshow over a filtered project list.

pub mod present;

//! # shipwright
//!
//! Release plumbing for app repositories.
//!
//! `shipwright` keeps a templated copyright header at the top of every source
//! file and extracts the release notes of one version from a changelog. The
//! rest of the crate is the glue a build script needs around those two
//! steps: listing files, running shell commands, and failing with a clear
//! message when a build rule is violated.
//!
//! ## Features
//!
//! * Render a header template with `{{date.year}}`, `{{file.name.ext}}`,
//!   `{{file.name}}` and user-defined parameters
//! * Replace whatever comment header a file already has, idempotently
//! * Check mode with diffs, to fail CI when headers are out of date
//! * Release notes for `## v.<version>` sections of a changelog
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use shipwright::changelog::{SectionEndPolicy, release_notes_for_repo};
//! use shipwright::fs_util::ListOptions;
//! use shipwright::header::{HeaderEngine, HeaderEngineConfig};
//! use shipwright::templates::HeaderTemplate;
//!
//! fn main() -> anyhow::Result<()> {
//!     let template = HeaderTemplate::from_headers_dir(Path::new("dir_headers"))?;
//!     let engine = HeaderEngine::new(HeaderEngineConfig::new(template, "2025"))?;
//!
//!     let options = ListOptions::default().with_extensions([".swift"]);
//!     let changed = engine.apply_to_dir(Path::new("Sources"), &options)?;
//!     println!("{} headers updated", changed.len());
//!
//!     let notes = release_notes_for_repo(Path::new("."), "1.4.0", SectionEndPolicy::default())?;
//!     println!("{}", notes);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`header`] - Header detection, stripping and rewriting
//! * [`templates`] - Header templates and their parameters
//! * [`changelog`] - Release notes extraction
//! * [`error`] - The build failure type and `fail_*` helpers
//!
//! [`header`]: crate::header
//! [`templates`]: crate::templates
//! [`changelog`]: crate::changelog
//! [`error`]: crate::error

pub mod changelog;
pub mod cli;
pub mod comment;
pub mod config;
pub mod diff;
pub mod error;
pub mod fs_util;
pub mod header;
pub mod logging;
pub mod output;
pub mod shell;
pub mod templates;

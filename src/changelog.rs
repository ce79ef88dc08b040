//! # Changelog Module
//!
//! Extracts the release notes of one version from a changelog whose sections
//! are headed by lines like `## v.1.2.3`.
//!
//! The section start is found by a literal substring search for
//! `## v.<version>`, while the section end is the next line matching the
//! generic `## v.<major>.<minor>.<patch>` pattern. The two rules are not
//! interchangeable: `## v.1.2` finds the `## v.1.2.3` section, and a heading
//! like `### v.1.2.3` also ends a section because the pattern is unanchored.
//!
//! The notes are returned trimmed and escaped for embedding in a
//! double-quoted shell or JSON string.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::fs_util::resolve_path;

/// File name of the changelog inside a repository.
pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// Matches any version heading, wherever it appears in the line.
static VERSION_HEADER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"## v\.\d+\.\d+\.\d+").expect("version header regex must compile"));

/// What to do when the requested section is the last one in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionEndPolicy {
  /// Fail unless another version heading follows the section.
  #[default]
  RequireNextHeader,
  /// Let the section run to the end of the document.
  AllowEndOfDocument,
}

/// The version marker line searched for literally.
pub fn version_marker(version: &str) -> String {
  format!("## v.{}", version)
}

/// Escapes `"` as `\"`, then each double backtick as an escaped single one.
pub fn escape_notes(notes: &str) -> String {
  notes.replace('"', "\\\"").replace("``", "\\`")
}

/// Returns the release notes for `version`, failing when the next version
/// heading cannot be found.
pub fn extract_release_notes(changelog: &str, version: &str) -> BuildResult<String> {
  extract_release_notes_with(changelog, version, SectionEndPolicy::RequireNextHeader)
}

/// Returns the release notes for `version` using the given end-of-section
/// policy.
///
/// # Errors
///
/// Fails if no line contains the version marker, or (under
/// [`SectionEndPolicy::RequireNextHeader`]) if no version heading follows it.
pub fn extract_release_notes_with(changelog: &str, version: &str, policy: SectionEndPolicy) -> BuildResult<String> {
  let lines: Vec<&str> = changelog.split_inclusive('\n').collect();
  let marker = version_marker(version);

  let start = lines
    .iter()
    .position(|line| line.contains(&marker))
    .map(|index| index + 1)
    .ok_or_else(|| BuildError::new(format!("Can't extract release notes: '{}' not found", marker)))?;

  // The line right after the marker is never treated as a boundary.
  let search_from = (start + 1).min(lines.len());
  let next_header = lines[search_from..]
    .iter()
    .position(|line| VERSION_HEADER_REGEX.is_match(line))
    .map(|offset| search_from + offset);

  let end = match (next_header, policy) {
    (Some(index), _) => index,
    (None, SectionEndPolicy::AllowEndOfDocument) => {
      debug!("No version heading after '{}', reading to the end of the document", marker);
      lines.len()
    }
    (None, SectionEndPolicy::RequireNextHeader) => {
      return Err(BuildError::new(format!(
        "Can't extract release notes: no version heading follows '{}'",
        marker
      )));
    }
  };

  let notes = lines.get(start..end).map(|section| section.concat()).unwrap_or_default();
  debug!("Extracted {} lines of notes for '{}'", end.saturating_sub(start), marker);

  Ok(escape_notes(notes.trim()))
}

/// Reads `<dir_repo>/CHANGELOG.md` and extracts the notes for `version`.
///
/// # Errors
///
/// Fails if the changelog is missing or unreadable, or if the notes cannot
/// be located.
pub fn release_notes_for_repo(dir_repo: &Path, version: &str, policy: SectionEndPolicy) -> Result<String> {
  release_notes_from_file(&dir_repo.join(CHANGELOG_FILE_NAME), version, policy)
}

/// Reads a changelog file and extracts the notes for `version`.
pub fn release_notes_from_file(path: &Path, version: &str, policy: SectionEndPolicy) -> Result<String> {
  let path = resolve_path(path)?;
  let changelog =
    fs::read_to_string(&path).with_context(|| format!("Failed to read changelog: {}", path.display()))?;

  Ok(extract_release_notes_with(&changelog, version, policy)?)
}

//! # Diff Module
//!
//! Renders line diffs between a file's current content and the content the
//! header engine would write. Used by `fix-headers --check` to show what a
//! real run would change.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff creation and rendering for header changes.
///
/// This struct handles:
/// - Generating diffs between original and modified content
/// - Displaying diffs to stderr with colorization
/// - Appending diffs to a file
#[derive(Debug, Clone, Default)]
pub struct DiffManager {
  /// Whether to show diffs on stderr
  pub show_diff: bool,

  /// Path to append diffs to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output was requested.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run starts with an empty one.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      std::fs::write(diff_path, "").with_context(|| format!("Failed to create diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Renders the diff between `original` and `new` as plain text.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);

    let mut diff_content = format!("Diff for {}:\n", path.display());
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      diff_content.push_str(sign);
      diff_content.push_str(change.as_str().unwrap_or_default());
      if change.missing_newline() {
        diff_content.push('\n');
      }
    }
    diff_content.push('\n');

    diff_content
  }

  /// Displays and/or saves the diff for one file.
  ///
  /// Diffs from several files are appended to the same diff file, creating
  /// a single consolidated file.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_enabled() {
      return Ok(());
    }

    let diff_content = Self::render(path, original, new);

    if self.show_diff {
      for line in diff_content.lines() {
        if line.starts_with('+') {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green()));
        } else if line.starts_with('-') {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red()));
        } else {
          eprintln!("{}", line);
        }
      }
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(diff_content.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_render_marks_changes() {
    let rendered = DiffManager::render(Path::new("a.swift"), "// old\nbody\n", "// new\nbody\n");

    assert!(rendered.starts_with("Diff for a.swift:\n"));
    assert!(rendered.contains("-// old\n"));
    assert!(rendered.contains("+// new\n"));
    assert!(rendered.contains(" body\n"));
  }

  #[test]
  fn test_render_without_trailing_newline() {
    let rendered = DiffManager::render(Path::new("a.swift"), "body", "// new\n\nbody");
    assert!(rendered.contains("+// new\n"));
    assert!(rendered.contains(" body\n"));
  }

  #[test]
  fn test_save_diff_appends() -> Result<()> {
    let temp_dir = tempdir()?;
    let diff_path = temp_dir.path().join("changes.diff");

    let manager = DiffManager::new(false, Some(diff_path.clone()));
    manager.init()?;
    manager.display_diff(Path::new("a.swift"), "a\n", "b\n")?;
    manager.display_diff(Path::new("b.swift"), "c\n", "d\n")?;

    let saved = std::fs::read_to_string(&diff_path)?;
    assert!(saved.contains("Diff for a.swift:"));
    assert!(saved.contains("Diff for b.swift:"));
    Ok(())
  }

  #[test]
  fn test_disabled_manager_writes_nothing() -> Result<()> {
    let manager = DiffManager::default();
    assert!(!manager.is_enabled());
    manager.display_diff(Path::new("a.swift"), "a\n", "b\n")?;
    Ok(())
  }
}

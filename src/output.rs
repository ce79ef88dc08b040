//! # Output Module
//!
//! This module centralizes all user-facing output for shipwright.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! Progress and result messages go to stdout unless quiet mode is on. The
//! `release-notes` command prints its result with [`print_notes`], which
//! ignores quiet mode because the notes are the command's output.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::header::HeaderOutcome;
use crate::logging::{is_quiet, is_verbose};

/// Symbols used in output
pub mod symbols {
  /// Nothing to change
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Would change in check mode
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header rewritten
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

fn files_word(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Print a section header in blue.
pub fn print_header(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.blue()));
}

/// Print a plain progress message.
pub fn print_progress(message: &str) {
  if !is_quiet() {
    println!("{}", message);
  }
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the files whose header changed, or would change in check mode.
///
/// Shows up to `limit` files (or `DEFAULT_FILE_LIST_LIMIT` if None). In
/// verbose mode, shows all files. In quiet mode only the bare paths are
/// printed, for scripting.
pub fn print_changed_files(files: &[impl AsRef<Path>], outcome: HeaderOutcome, base: Option<&Path>, limit: Option<usize>) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    for file in files {
      println!("{}", make_relative_path(file.as_ref(), base));
    }
    return;
  }

  let count = files.len();
  let header = match outcome {
    HeaderOutcome::WouldRewrite => format!(
      "{} {} {} with outdated headers:",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      count,
      files_word(count)
    ),
    HeaderOutcome::Rewritten | HeaderOutcome::Unchanged => format!(
      "{} Updated header in {} {}:",
      symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
      count,
      files_word(count)
    ),
  };
  println!("{}", header);

  let show_all = is_verbose();
  let effective_limit = if show_all {
    count
  } else {
    limit.unwrap_or(DEFAULT_FILE_LIST_LIMIT)
  };

  for file in files.iter().take(effective_limit) {
    println!("  {}", make_relative_path(file.as_ref(), base));
  }

  if !show_all && count > effective_limit {
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      count - effective_limit
    );
  }
}

/// Print the success message when no header needs a change.
pub fn print_all_files_ok(file_count: usize) {
  if is_quiet() {
    return;
  }

  println!(
    "{} All {} {} have up-to-date headers.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    file_count,
    files_word(file_count)
  );
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Print extracted release notes.
pub fn print_notes(notes: &str) {
  println!("{}", notes);
}

/// Make a path relative to `base` for display, falling back to the path as
/// given.
pub fn make_relative_path(path: &Path, base: Option<&Path>) -> String {
  let relative = base.and_then(|base| {
    if path.is_absolute() == base.is_absolute() {
      pathdiff::diff_paths(path, base)
    } else {
      None
    }
  });

  match relative {
    Some(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
    _ => path.to_string_lossy().into_owned(),
  }
}

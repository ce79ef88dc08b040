//! # Header Module
//!
//! The header engine: detects the comment block at the top of a source file,
//! throws it away, and writes the rendered header template in its place.
//!
//! A file is only rewritten when the new content differs byte-for-byte from
//! what is on disk, so running the engine twice in a row changes nothing the
//! second time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use shipwright::header::{HeaderEngine, HeaderEngineConfig};
//! use shipwright::templates::HeaderTemplate;
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = HeaderTemplate::new("//\n//  {{file.name.ext}}\n//  Copyright {{date.year}} Acme\n//");
//! let engine = HeaderEngine::new(HeaderEngineConfig::new(template, "2025"))?;
//!
//! let changed = engine.apply_all(&[PathBuf::from("Sources/App.swift")])?;
//! println!("{} files rewritten", changed.len());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace};

use crate::comment::CommentStyle;
use crate::diff::DiffManager;
use crate::error::BuildError;
use crate::fs_util::{ListOptions, list_files};
use crate::templates::{HeaderTemplate, ParamSet};

/// First lines that must stay above the header.
const PROLOGUE_PREFIXES: [&str; 4] = ["#!", "<?xml", "<!doctype", "<?php"];

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
  /// The file already had the expected header
  Unchanged,
  /// The file was rewritten
  Rewritten,
  /// The file would have been rewritten (dry run)
  WouldRewrite,
}

impl HeaderOutcome {
  /// Whether the file differs (or differed) from the expected content.
  pub const fn is_change(self) -> bool {
    !matches!(self, HeaderOutcome::Unchanged)
  }
}

/// Splits `source` into its leading comment header and the body after it.
///
/// The header is the longest run of comment lines and blocks starting at the
/// first byte of `source`, returned without its final line terminator. The
/// body has its leading blank lines removed. When `source` does not start
/// with a comment the header is empty.
///
/// A block comment counts only if it is terminated and nothing but
/// whitespace follows the closing delimiter on its line, so code is never
/// swallowed into the header.
///
/// Prologue lines are not special here: under the `hash` style a leading
/// `#!` line is part of the header. [`compose`] splits the prologue off
/// before calling this.
pub fn strip_header<'a>(source: &'a str, style: &CommentStyle) -> (&'a str, &'a str) {
  let header_end = header_len(source, style);
  if header_end == 0 {
    return ("", skip_blank_lines(source));
  }

  let header = trim_line_ending(&source[..header_end]);
  (header, skip_blank_lines(&source[header_end..]))
}

/// Byte length of the header block, including the terminator of its last
/// line.
fn header_len(source: &str, style: &CommentStyle) -> usize {
  let mut pos = 0;

  while pos < source.len() {
    let rest = &source[pos..];
    let line_end = rest.find('\n').map_or(rest.len(), |idx| idx + 1);
    let line = &rest[..line_end];

    // The first line has to start right at the first byte.
    let candidate = if pos == 0 { line } else { line.trim_start() };
    let indent = line.len() - candidate.len();

    if let Some(prefix) = style.line_prefix()
      && candidate.starts_with(prefix)
    {
      pos += line_end;
      continue;
    }

    if let Some((open, close)) = style.block_pair()
      && candidate.starts_with(open)
      && let Some(block_len) = block_len(&rest[indent..], open, close)
    {
      pos += indent + block_len;
      continue;
    }

    break;
  }

  pos
}

/// Length of a block comment starting at the beginning of `text`, up to and
/// including the end of the line holding the closing delimiter.
fn block_len(text: &str, open: &str, close: &str) -> Option<usize> {
  let close_at = text[open.len()..].find(close)? + open.len();
  let after_close = close_at + close.len();

  let tail = &text[after_close..];
  let tail_end = tail.find('\n').map_or(tail.len(), |idx| idx + 1);
  if !tail[..tail_end].trim().is_empty() {
    trace!("Block comment is followed by code on the same line");
    return None;
  }

  Some(after_close + tail_end)
}

fn trim_line_ending(text: &str) -> &str {
  let text = text.strip_suffix('\n').unwrap_or(text);
  text.strip_suffix('\r').unwrap_or(text)
}

fn skip_blank_lines(text: &str) -> &str {
  let mut rest = text;
  while let Some(idx) = rest.find('\n') {
    if !rest[..idx].trim().is_empty() {
      return rest;
    }
    rest = &rest[idx + 1..];
  }

  if rest.trim().is_empty() { "" } else { rest }
}

/// Splits off a first line that has to stay at the very top of the file
/// (shebang, XML declaration, ...). The returned prologue keeps its newline.
fn split_prologue(content: &str) -> (&str, &str) {
  let first_line_end = content.find('\n').map_or(content.len(), |idx| idx + 1);
  let first_line = content[..first_line_end].to_lowercase();

  if PROLOGUE_PREFIXES.iter().any(|prefix| first_line.starts_with(prefix)) {
    (&content[..first_line_end], &content[first_line_end..])
  } else {
    ("", content)
  }
}

/// Builds the new content of a file: any prologue line, the rendered header,
/// one blank line, and the body left after removing the old header.
pub fn compose(source: &str, rendered_header: &str, style: &CommentStyle) -> String {
  let (prologue, content) = split_prologue(source);
  let (_, body) = strip_header(skip_blank_lines(content), style);

  let mut result = String::with_capacity(prologue.len() + rendered_header.len() + body.len() + 3);
  result.push_str(prologue);
  if !prologue.is_empty() && !prologue.ends_with('\n') {
    result.push('\n');
  }
  result.push_str(rendered_header);
  result.push_str("\n\n");
  result.push_str(body);
  result
}

/// Checks that a rendered header would be recognized as a header again on the
/// next run. Anything else would be duplicated every time the engine runs.
fn ensure_comment_block(rendered: &str, style: &CommentStyle, path: &Path) -> Result<(), BuildError> {
  if rendered.trim().is_empty() {
    return Err(BuildError::new("Header template is empty"));
  }

  let (_, rest) = strip_header(rendered, style);
  if !rest.is_empty() {
    return Err(BuildError::new(format!(
      "Header template for '{}' is not a single comment block in the configured comment style (left over: {:?})",
      path.display(),
      rest.lines().next().unwrap_or_default()
    )));
  }
  Ok(())
}

/// Configuration for creating a [`HeaderEngine`].
pub struct HeaderEngineConfig {
  pub template: HeaderTemplate,
  /// Copyright year used for the `date.year` placeholder
  pub year: String,
  /// Parameters shared by every file; per-file parameters win on conflicts
  pub params: ParamSet,
  /// Comment style of every file in the run
  pub style: CommentStyle,
  /// Format the template as a comment in the run's style before rendering
  pub wrap: bool,
  /// Compute outcomes without writing files
  pub dry_run: bool,
  pub diff_manager: DiffManager,
}

impl HeaderEngineConfig {
  /// Creates a config with required fields and defaults: C-style comments,
  /// no extra parameters, no wrapping, writes enabled, no diffs.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// HeaderEngineConfig {
  ///     dry_run: true,
  ///     ..HeaderEngineConfig::new(template, "2025")
  /// }
  /// ```
  pub fn new(template: HeaderTemplate, year: impl Into<String>) -> Self {
    Self {
      template,
      year: year.into(),
      params: ParamSet::new(),
      style: CommentStyle::default(),
      wrap: false,
      dry_run: false,
      diff_manager: DiffManager::default(),
    }
  }
}

/// Rewrites the leading header block of source files.
pub struct HeaderEngine {
  template: HeaderTemplate,
  year: String,
  params: ParamSet,
  style: CommentStyle,
  wrap: bool,
  dry_run: bool,
  diff_manager: DiffManager,
}

impl HeaderEngine {
  /// Creates a new engine.
  ///
  /// # Errors
  ///
  /// Returns an error if the template is empty.
  pub fn new(config: HeaderEngineConfig) -> Result<Self> {
    if config.template.as_str().trim().is_empty() {
      return Err(BuildError::new("Header template is empty").into());
    }

    debug!(
      "Header template uses placeholders: {:?}",
      config.template.placeholders()
    );

    Ok(Self {
      template: config.template,
      year: config.year,
      params: config.params,
      style: config.style,
      wrap: config.wrap,
      dry_run: config.dry_run,
      diff_manager: config.diff_manager,
    })
  }

  /// Renders the header for a specific file.
  pub fn render_for(&self, path: &Path) -> String {
    let params = self.params.merged_with(&ParamSet::for_file(path, &self.year));
    if self.wrap {
      self.template.wrapped(&self.style).render(&params)
    } else {
      self.template.render(&params)
    }
  }

  /// Computes the content `path` should have, given its current content.
  ///
  /// # Errors
  ///
  /// Returns an error if the rendered header is not a comment block in the
  /// run's comment style.
  pub fn expected_content(&self, path: &Path, source: &str) -> Result<String> {
    let rendered = self.render_for(path);
    ensure_comment_block(&rendered, &self.style, path)?;
    Ok(compose(source, &rendered, &self.style))
  }

  /// Brings the header of one file in line with the template.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or written, or if the
  /// template does not render to a comment block.
  pub fn process_file(&self, path: &Path) -> Result<HeaderOutcome> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let new_source = self.expected_content(path, &source)?;

    if new_source == source {
      trace!("Header up to date: {}", path.display());
      return Ok(HeaderOutcome::Unchanged);
    }

    if self.dry_run {
      debug!("Header would change: {}", path.display());
      self.diff_manager.display_diff(path, &source, &new_source)?;
      return Ok(HeaderOutcome::WouldRewrite);
    }

    fs::write(path, &new_source).with_context(|| format!("Failed to write file: {}", path.display()))?;
    debug!("Header rewritten: {}", path.display());
    Ok(HeaderOutcome::Rewritten)
  }

  /// Like [`process_file`](Self::process_file), reduced to whether the file
  /// changed (or would change in a dry run).
  pub fn apply(&self, path: &Path) -> Result<bool> {
    Ok(self.process_file(path)?.is_change())
  }

  /// Applies the header to every file in order and returns the ones that
  /// changed.
  ///
  /// Stops at the first failure; files handled before it keep their new
  /// content.
  pub fn apply_all(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut changed = Vec::new();

    for path in files {
      if self.apply(path)? {
        changed.push(path.clone());
      }
    }

    debug!("{} of {} files changed", changed.len(), files.len());
    Ok(changed)
  }

  /// Lists the files below `project_dir` and applies the header to them.
  ///
  /// # Errors
  ///
  /// Returns an error if listing fails or any file fails to apply.
  pub fn apply_to_dir(&self, project_dir: &Path, options: &ListOptions) -> Result<Vec<PathBuf>> {
    let files = list_files(project_dir, &options.clone().with_dirs(false))?;
    self.apply_all(&files)
  }
}

//! # Templates Module
//!
//! This module provides the header template and the parameters used to
//! render it.
//!
//! The module includes:
//! - [`HeaderTemplate`] for loading and rendering header templates
//! - [`ParamSet`] for the values substituted into `{{name}}` placeholders
//!
//! ## Example
//!
//! ```rust
//! use shipwright::templates::{HeaderTemplate, ParamSet};
//!
//! let template = HeaderTemplate::new("// Copyright {{date.year}} {{file.name}}");
//!
//! let mut params = ParamSet::new();
//! params.set_param("date.year", "2024");
//! params.set_param("file.name", "Foo");
//!
//! assert_eq!(template.render(&params), "// Copyright 2024 Foo");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::comment::CommentStyle;
use crate::fs_util::resolve_path;
use crate::verbose_log;

/// File name of the template inside a headers directory.
pub const TEMPLATE_FILE_NAME: &str = "copyright.txt";

/// Placeholder for the four-digit copyright year.
pub const PARAM_YEAR: &str = "date.year";

/// Placeholder for the file's base name including its extension.
pub const PARAM_FILE_NAME_EXT: &str = "file.name.ext";

/// Placeholder for the file's base name without its extension.
pub const PARAM_FILE_NAME: &str = "file.name";

/// Matches a `{{name}}` token; the name cannot contain braces.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder regex must compile"));

/// Values substituted into a template, keyed by placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
  values: BTreeMap<String, String>,
}

impl ParamSet {
  /// Creates an empty parameter set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets a parameter, replacing any previous value.
  pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.values.insert(name.into(), value.into());
  }

  /// Looks up a parameter value.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }

  /// Returns a copy of `self` with every entry of `other` applied on top.
  pub fn merged_with(&self, other: &ParamSet) -> ParamSet {
    let mut merged = self.clone();
    merged.values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Derived parameters for a single file: the base name with and without
  /// its extension, plus the copyright year.
  pub fn for_file(path: &Path, year: &str) -> ParamSet {
    let mut params = ParamSet::new();
    params.set_param(PARAM_YEAR, year);

    let name_ext = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    let name = path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default();

    params.set_param(PARAM_FILE_NAME_EXT, name_ext);
    params.set_param(PARAM_FILE_NAME, name);
    params
  }
}

impl<K, V> FromIterator<(K, V)> for ParamSet
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut params = ParamSet::new();
    for (name, value) in iter {
      params.set_param(name, value);
    }
    params
  }
}

/// A header template with `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
  content: String,
}

impl HeaderTemplate {
  /// Creates a template from its text.
  pub fn new(content: impl Into<String>) -> Self {
    Self {
      content: content.into(),
    }
  }

  /// Loads a header template from a file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not valid UTF-8.
  pub fn load(path: &Path) -> Result<Self> {
    verbose_log!("Loading template from: {}", path.display());

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read header template file: {}", path.display()))?;

    Ok(Self::new(content))
  }

  /// Loads `<dir_headers>/copyright.txt`.
  ///
  /// # Errors
  ///
  /// Fails with a [`BuildError`](crate::error::BuildError) if the file does
  /// not exist, or if it cannot be read.
  pub fn from_headers_dir(dir_headers: &Path) -> Result<Self> {
    let path = resolve_path(&dir_headers.join(TEMPLATE_FILE_NAME))?;
    Self::load(&path)
  }

  /// The raw template text.
  pub fn as_str(&self) -> &str {
    &self.content
  }

  /// Returns this template formatted as a comment in the given style.
  ///
  /// Used for templates kept as plain legal text rather than as a ready-made
  /// comment block.
  pub fn wrapped(&self, style: &CommentStyle) -> HeaderTemplate {
    HeaderTemplate::new(style.wrap(&self.content))
  }

  /// Renders the template with the given parameters.
  ///
  /// Every `{{name}}` whose name is a key of `params` is replaced by its value
  /// in a single pass, so substituted values are never re-scanned. Tokens
  /// with unknown names are left as they are.
  pub fn render(&self, params: &ParamSet) -> String {
    PLACEHOLDER_REGEX
      .replace_all(&self.content, |caps: &Captures| match params.get(&caps[1]) {
        Some(value) => value.to_string(),
        None => caps[0].to_string(),
      })
      .into_owned()
  }

  /// Names of all placeholders in the template, in order of first use.
  pub fn placeholders(&self) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_REGEX.captures_iter(&self.content) {
      let name = &caps[1];
      if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
      }
    }
    names
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  #[test]
  fn test_render_known_placeholders() {
    let template = HeaderTemplate::new("Copyright {{date.year}} {{file.name}}");
    let params: ParamSet = [("date.year", "2024"), ("file.name", "Foo")].into_iter().collect();

    assert_eq!(template.render(&params), "Copyright 2024 Foo");
  }

  #[test]
  fn test_render_keeps_unknown_placeholders() {
    let template = HeaderTemplate::new("{{unknown}} and {{file.name}}");
    let params: ParamSet = [("file.name", "Foo")].into_iter().collect();

    assert_eq!(template.render(&params), "{{unknown}} and Foo");
  }

  #[test]
  fn test_render_does_not_rescan_values() {
    let template = HeaderTemplate::new("{{a}} {{b}}");
    let params: ParamSet = [("a", "{{b}}"), ("b", "B")].into_iter().collect();

    assert_eq!(template.render(&params), "{{b}} B");
  }

  #[test]
  fn test_render_repeated_placeholder() {
    let template = HeaderTemplate::new("{{file.name}}/{{file.name}}");
    let params: ParamSet = [("file.name", "Foo")].into_iter().collect();

    assert_eq!(template.render(&params), "Foo/Foo");
  }

  #[test]
  fn test_render_without_placeholders() {
    let template = HeaderTemplate::new("// plain { text } {{ }");
    assert_eq!(template.render(&ParamSet::new()), "// plain { text } {{ }");
  }

  #[test]
  fn test_for_file_params() {
    let params = ParamSet::for_file(Path::new("src/App/AppDelegate.swift"), "2025");

    assert_eq!(params.get(PARAM_YEAR), Some("2025"));
    assert_eq!(params.get(PARAM_FILE_NAME_EXT), Some("AppDelegate.swift"));
    assert_eq!(params.get(PARAM_FILE_NAME), Some("AppDelegate"));
  }

  #[test]
  fn test_for_file_strips_only_last_extension() {
    let params = ParamSet::for_file(Path::new("bundle.min.js"), "2025");

    assert_eq!(params.get(PARAM_FILE_NAME_EXT), Some("bundle.min.js"));
    assert_eq!(params.get(PARAM_FILE_NAME), Some("bundle.min"));
  }

  #[test]
  fn test_merged_with_prefers_other() {
    let base: ParamSet = [("project", "Demo"), ("date.year", "1999")].into_iter().collect();
    let derived: ParamSet = [("date.year", "2025")].into_iter().collect();

    let merged = base.merged_with(&derived);
    assert_eq!(merged.get("project"), Some("Demo"));
    assert_eq!(merged.get("date.year"), Some("2025"));
    assert_eq!(merged.len(), 2);
  }

  #[test]
  fn test_placeholders_in_order() {
    let template = HeaderTemplate::new("{{file.name.ext}} {{project}} {{file.name.ext}} {{date.year}}");
    assert_eq!(template.placeholders(), vec!["file.name.ext", "project", "date.year"]);
  }

  #[test]
  fn test_wrapped_template() {
    let template = HeaderTemplate::new("Copyright {{date.year}}");
    let wrapped = template.wrapped(&CommentStyle::hash());
    assert_eq!(wrapped.as_str(), "# Copyright {{date.year}}");
  }

  #[test]
  fn test_from_headers_dir() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    assert!(HeaderTemplate::from_headers_dir(temp_dir.path()).is_err());

    std::fs::write(temp_dir.path().join(TEMPLATE_FILE_NAME), "// Copyright {{date.year}}\n")?;
    let template = HeaderTemplate::from_headers_dir(temp_dir.path())?;
    assert_eq!(template.as_str(), "// Copyright {{date.year}}\n");
    Ok(())
  }
}

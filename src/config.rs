//! # Configuration Module
//!
//! This module provides configuration support for shipwright, so a
//! repository can keep its header template, comment style and changelog
//! settings next to the code instead of repeating them on every invocation.
//!
//! Configuration can be specified in a `.shipwright.toml` file or via the
//! `SHIPWRIGHT_CONFIG` environment variable. Command-line flags always take
//! precedence over values read from the file.
//!
//! ```toml
//! [header]
//! template = "dir_headers/copyright.txt"
//! comment-style = "c"
//! ignored = ["Pods", "*.generated.swift"]
//! extensions = [".swift", ".h", ".m"]
//!
//! [header.params]
//! company = "Acme Corp"
//!
//! [changelog]
//! file = "CHANGELOG.md"
//! allow-last-section = false
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::comment::{CommentStyle, StyleSelection};
use crate::templates::ParamSet;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".shipwright.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "SHIPWRIGHT_CONFIG";

/// Settings of the `fix-headers` command.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HeaderConfig {
  /// Path of the header template file.
  #[serde(default)]
  pub template: Option<PathBuf>,

  /// Comment style preset name.
  #[serde(default)]
  pub comment_style: Option<String>,

  /// User-defined comment delimiters; excludes `comment-style`.
  #[serde(default)]
  pub custom_style: Option<CommentStyle>,

  /// Treat the template as plain text and wrap it in comments.
  #[serde(default)]
  pub wrap: bool,

  /// Copyright year; defaults to the current year.
  #[serde(default)]
  pub year: Option<String>,

  /// Base names or globs skipped while listing files.
  #[serde(default)]
  pub ignored: Vec<String>,

  /// Extensions (with leading dot) of the files to process.
  #[serde(default)]
  pub extensions: Vec<String>,

  /// Extra template parameters.
  #[serde(default)]
  pub params: BTreeMap<String, String>,
}

impl HeaderConfig {
  /// The style selection configured in this section, if any.
  pub fn style_selection(&self) -> Result<Option<StyleSelection>, ConfigError> {
    if let Some(ref style) = self.custom_style {
      return Ok(Some(StyleSelection::Custom(style.clone())));
    }

    self
      .comment_style
      .as_deref()
      .map(|name| {
        name.parse::<StyleSelection>().map_err(|err| ConfigError::InvalidCommentStyle {
          message: err.message().to_string(),
        })
      })
      .transpose()
  }

  /// The extra parameters as a [`ParamSet`].
  pub fn param_set(&self) -> ParamSet {
    self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
  }
}

/// Settings of the `release-notes` command.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChangelogConfig {
  /// Changelog path; defaults to `CHANGELOG.md` in the repository.
  #[serde(default)]
  pub file: Option<PathBuf>,

  /// Let the last section of the changelog run to the end of the file.
  #[serde(default)]
  pub allow_last_section: bool,
}

/// Main configuration struct for shipwright.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  #[serde(default)]
  pub header: HeaderConfig,

  #[serde(default)]
  pub changelog: ChangelogConfig,

  /// Directory holding the config file; relative paths resolve against it.
  #[serde(skip)]
  pub base_dir: Option<PathBuf>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// The comment style settings are invalid.
  #[error("Invalid comment style: {message}")]
  InvalidCommentStyle { message: String },

  /// An extension filter entry is malformed.
  #[error("Invalid extension '{extension}': {message}")]
  InvalidExtension { extension: String, message: String },

  /// The configured year is not a four-digit number.
  #[error("Invalid year '{year}': expected four digits")]
  InvalidYear { year: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read,
  /// parsed or validated.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;
    config.base_dir = path.parent().map(Path::to_path_buf);

    verbose_log!("Loaded {} extra template parameters", config.header.params.len());

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - `comment-style` names a known preset
  /// - `comment-style` and `custom-style` are not both set
  /// - a custom style defines a line prefix or both block delimiters
  /// - extensions include their leading dot
  /// - the year has four digits
  pub fn validate(&self) -> Result<(), ConfigError> {
    let header = &self.header;

    if header.comment_style.is_some() && header.custom_style.is_some() {
      return Err(ConfigError::InvalidCommentStyle {
        message: "comment-style and custom-style cannot both be set".to_string(),
      });
    }

    if let Some(ref style) = header.custom_style {
      style.validate().map_err(|err| ConfigError::InvalidCommentStyle {
        message: err.message().to_string(),
      })?;
    }

    header.style_selection()?;

    for ext in &header.extensions {
      if !ext.starts_with('.') || ext.len() < 2 {
        return Err(ConfigError::InvalidExtension {
          extension: ext.clone(),
          message: "extension should start with a dot, e.g. \".swift\"".to_string(),
        });
      }
    }

    if let Some(ref year) = header.year
      && !is_valid_year(year)
    {
      return Err(ConfigError::InvalidYear { year: year.clone() });
    }

    Ok(())
  }

  /// Resolves a path from the config file against the config's directory.
  pub fn resolve_path(&self, path: &Path) -> PathBuf {
    match self.base_dir {
      Some(ref base) if path.is_relative() => base.join(path),
      _ => path.to_path_buf(),
    }
  }

  /// The configured template path, resolved.
  pub fn template_path(&self) -> Option<PathBuf> {
    self.header.template.as_deref().map(|path| self.resolve_path(path))
  }

  /// The configured changelog path, resolved.
  pub fn changelog_path(&self) -> Option<PathBuf> {
    self.changelog.file.as_deref().map(|path| self.resolve_path(path))
  }
}

/// Whether `year` is a four-digit number.
pub fn is_valid_year(year: &str) -> bool {
  year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `SHIPWRIGHT_CONFIG` environment variable
/// 3. `.shipwright.toml` in the current directory
///
/// An explicit path that does not exist is an error rather than a silent
/// fallback.
pub fn discover_config_path(explicit_path: Option<&Path>, current_dir: &Path) -> Result<Option<PathBuf>> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Ok(Some(path.to_path_buf()));
    }
    anyhow::bail!("Config file not found: {}", path.display());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Ok(Some(path));
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = current_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Ok(Some(local_config));
  }

  verbose_log!("No config file found");
  Ok(None)
}

/// Load configuration from the discovered path, or return a default config.
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `current_dir` - Directory searched for `.shipwright.toml`
/// * `no_config` - If true, skip config file discovery and use defaults
pub fn load_config(explicit_path: Option<&Path>, current_dir: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  match discover_config_path(explicit_path, current_dir)? {
    Some(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
    None => Ok(Config::default()),
  }
}

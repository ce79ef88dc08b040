//! # Fix Headers Command
//!
//! Rewrites the copyright header of every source file below a project
//! directory, or reports the files that need it with `--check`.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use super::GlobalArgs;
use crate::comment::StyleSelection;
use crate::config::{Config, is_valid_year, load_config};
use crate::diff::DiffManager;
use crate::error::fail_script;
use crate::fs_util::{ListOptions, list_files, resolve_path};
use crate::header::{HeaderEngine, HeaderEngineConfig, HeaderOutcome};
use crate::info_log;
use crate::output::{
  make_relative_path, print_all_files_ok, print_blank_line, print_changed_files, print_header, print_hint,
  print_progress,
};
use crate::templates::{HeaderTemplate, ParamSet};

/// Arguments for the fix-headers command
#[derive(Args, Debug, Default)]
pub struct FixHeadersArgs {
  /// Project directory (or single file) to process
  #[arg(default_value = ".")]
  pub project_dir: PathBuf,

  /// Header template file
  #[arg(long, short = 't', value_name = "FILE", conflicts_with = "headers_dir")]
  pub template: Option<PathBuf>,

  /// Directory holding the header template as copyright.txt
  #[arg(long, value_name = "DIR")]
  pub headers_dir: Option<PathBuf>,

  /// Comment style used for every file: c, hash, dash, xml or semicolon
  #[arg(long, value_name = "STYLE")]
  pub comment_style: Option<String>,

  /// Treat the template as plain text and wrap it in comments
  #[arg(long)]
  pub wrap: bool,

  /// Copyright year (default: current year)
  #[arg(long)]
  pub year: Option<String>,

  /// Extra template parameter (repeatable)
  #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
  pub params: Vec<(String, String)>,

  /// File or directory name to skip, glob patterns allowed (repeatable)
  #[arg(long, short = 'i', value_name = "NAME")]
  pub ignore: Vec<String>,

  /// Only process files with this extension, e.g. .swift (repeatable)
  #[arg(long = "ext", value_name = "EXT")]
  pub extensions: Vec<String>,

  /// Report files whose header is out of date without modifying them; exits
  /// with status 1 if there are any
  #[arg(long)]
  pub check: bool,

  /// Show diff of changes in check mode
  #[arg(long, requires = "check")]
  pub show_diff: bool,

  /// Save diff of changes to a file in check mode
  #[arg(long, short = 'o', value_name = "FILE", requires = "check")]
  pub save_diff: Option<PathBuf>,

  /// Print a JSON summary instead of the human-readable output
  #[arg(long)]
  pub json: bool,
}

/// Parses a `KEY=VALUE` template parameter.
fn parse_param(raw: &str) -> Result<(String, String), String> {
  match raw.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
    _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
  }
}

/// Adds the leading dot to an extension given without one.
fn normalize_extension(ext: &str) -> String {
  if ext.starts_with('.') {
    ext.to_string()
  } else {
    format!(".{}", ext)
  }
}

/// JSON summary printed with `--json`.
#[derive(Debug, Serialize)]
struct FixHeadersReport {
  check: bool,
  files_checked: usize,
  changed: Vec<String>,
}

impl FixHeadersArgs {
  fn load_template(&self, config: &Config) -> Result<HeaderTemplate> {
    if let Some(ref template) = self.template {
      return HeaderTemplate::load(&resolve_path(template)?);
    }
    if let Some(ref dir_headers) = self.headers_dir {
      return HeaderTemplate::from_headers_dir(dir_headers);
    }
    if let Some(template) = config.template_path() {
      return HeaderTemplate::load(&resolve_path(&template)?);
    }
    Err(fail_script("Missing required argument: --template <FILE> or --headers-dir <DIR>").into())
  }

  fn style_selection(&self, config: &Config) -> Result<StyleSelection> {
    if let Some(ref name) = self.comment_style {
      return Ok(name.parse()?);
    }
    Ok(config.header.style_selection()?.unwrap_or_default())
  }

  fn year(&self, config: &Config) -> Result<String> {
    match self.year.as_ref().or(config.header.year.as_ref()) {
      Some(year) if is_valid_year(year) => Ok(year.clone()),
      Some(year) => Err(fail_script(format!("Invalid year '{}': expected four digits", year)).into()),
      None => Ok(chrono::Local::now().year().to_string()),
    }
  }

  fn params(&self, config: &Config) -> ParamSet {
    let cli_params: ParamSet = self.params.iter().cloned().collect();
    config.header.param_set().merged_with(&cli_params)
  }

  fn list_options(&self, config: &Config) -> ListOptions {
    let extensions: Vec<String> = if self.extensions.is_empty() {
      config.header.extensions.clone()
    } else {
      self.extensions.iter().map(|ext| normalize_extension(ext)).collect()
    };

    ListOptions::default()
      .with_ignored(config.header.ignored.iter().cloned())
      .with_ignored(self.ignore.iter().cloned())
      .with_extensions(extensions)
  }
}

fn collect_files(project_dir: &Path, options: &ListOptions) -> Result<Vec<PathBuf>> {
  let project_dir = resolve_path(project_dir)?;
  if project_dir.is_file() {
    return Ok(vec![project_dir]);
  }
  list_files(&project_dir, options)
}

/// Run the fix-headers command with the given arguments
pub fn run_fix_headers(args: FixHeadersArgs, global: &GlobalArgs) -> Result<()> {
  let current_dir = std::env::current_dir().context("Failed to determine current directory")?;
  let config = load_config(global.config.as_deref(), &current_dir, global.no_config)?;

  let template = args.load_template(&config)?;
  let style = args.style_selection(&config)?;
  debug!("Using comment style selection: {:?}", style);

  let human = !args.json;
  if human {
    print_header(if args.check { "Checking headers..." } else { "Fixing headers..." });
  }

  let files = collect_files(&args.project_dir, &args.list_options(&config))?;
  if human {
    print_progress(&format!(
      "{} {} {}...",
      if args.check { "Checking" } else { "Processing" },
      files.len(),
      if files.len() == 1 { "file" } else { "files" }
    ));
  }

  // Created after listing so the diff file is never processed itself.
  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let engine = HeaderEngine::new(HeaderEngineConfig {
    params: args.params(&config),
    style: style.style(),
    wrap: args.wrap || config.header.wrap,
    dry_run: args.check,
    diff_manager,
    ..HeaderEngineConfig::new(template, args.year(&config)?)
  })?;

  let changed = engine.apply_all(&files)?;
  let base = Some(args.project_dir.as_path());

  if args.json {
    let report = FixHeadersReport {
      check: args.check,
      files_checked: files.len(),
      changed: changed.iter().map(|path| make_relative_path(path, base)).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_blank_line();
    if changed.is_empty() {
      print_all_files_ok(files.len());
    } else {
      let outcome = if args.check {
        HeaderOutcome::WouldRewrite
      } else {
        HeaderOutcome::Rewritten
      };
      print_changed_files(&changed, outcome, base, None);

      if args.check {
        print_blank_line();
        print_hint("Run without --check to rewrite these headers.");
      }
    }

    if let Some(ref diff_path) = args.save_diff {
      info_log!("Saved diff to {}", diff_path.display());
    }
  }

  // Exit with non-zero code if in check mode and there are outdated headers
  if args.check && !changed.is_empty() {
    process::exit(1);
  }

  Ok(())
}

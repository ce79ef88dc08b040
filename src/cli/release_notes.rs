//! # Release Notes Command
//!
//! Prints the notes of one version from the changelog on stdout, escaped for
//! use inside a double-quoted string.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::GlobalArgs;
use crate::changelog::{CHANGELOG_FILE_NAME, SectionEndPolicy, release_notes_from_file};
use crate::config::{Config, load_config};
use crate::output::print_notes;

/// Arguments for the release-notes command
#[derive(Args, Debug, Default)]
pub struct ReleaseNotesArgs {
  /// Version whose notes to print, e.g. 1.4.0
  pub version: String,

  /// Repository directory holding CHANGELOG.md (default: current directory)
  #[arg(long, value_name = "DIR", conflicts_with = "file")]
  pub repo: Option<PathBuf>,

  /// Changelog file to read instead of <repo>/CHANGELOG.md
  #[arg(long, short = 'f', value_name = "FILE")]
  pub file: Option<PathBuf>,

  /// Let the last version's section run to the end of the changelog instead
  /// of failing
  #[arg(long)]
  pub allow_last_section: bool,
}

impl ReleaseNotesArgs {
  /// The changelog to read: `--file`, then `--repo`, then the config file,
  /// then `./CHANGELOG.md`.
  fn changelog_path(&self, config: &Config) -> PathBuf {
    if let Some(ref file) = self.file {
      return file.clone();
    }
    if let Some(ref repo) = self.repo {
      return repo.join(CHANGELOG_FILE_NAME);
    }
    config
      .changelog_path()
      .unwrap_or_else(|| PathBuf::from(CHANGELOG_FILE_NAME))
  }

  fn policy(&self, config: &Config) -> SectionEndPolicy {
    if self.allow_last_section || config.changelog.allow_last_section {
      SectionEndPolicy::AllowEndOfDocument
    } else {
      SectionEndPolicy::RequireNextHeader
    }
  }
}

/// Run the release-notes command with the given arguments
pub fn run_release_notes(args: ReleaseNotesArgs, global: &GlobalArgs) -> Result<()> {
  let current_dir = std::env::current_dir().context("Failed to determine current directory")?;
  let config = load_config(global.config.as_deref(), &current_dir, global.no_config)?;

  let path = args.changelog_path(&config);
  let policy = args.policy(&config);
  debug!("Reading release notes for {} from {} ({:?})", args.version, path.display(), policy);

  let notes = release_notes_from_file(&path, &args.version, policy)?;
  print_notes(&notes);

  Ok(())
}

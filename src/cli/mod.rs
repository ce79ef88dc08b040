//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing, with one subcommand per build step.

mod fix_headers;
mod release_notes;

use std::sync::LazyLock;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
pub use fix_headers::{FixHeadersArgs, run_fix_headers};
pub use release_notes::{ReleaseNotesArgs, run_release_notes};

use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Package version, with the commit hash when the build could read it.
static VERSION: LazyLock<String> = LazyLock::new(|| match option_env!("GIT_HASH") {
  Some(hash) if !hash.is_empty() => format!("{} ({})", env!("CARGO_PKG_VERSION"), hash),
  _ => env!("CARGO_PKG_VERSION").to_string(),
});

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  name = "shipwright",
  author,
  version = VERSION.as_str(),
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Rewrite headers from dir_headers/copyright.txt in every Swift file
  shipwright fix-headers --headers-dir dir_headers --ext .swift .

  # Fail if any header is out of date, showing what would change
  shipwright fix-headers --check --show-diff --template copyright.txt Sources/

  # Wrap a plain legal text in shell comments
  shipwright fix-headers --wrap --comment-style hash --template LICENSE_HEADER.txt scripts/

  # Print the release notes of version 1.4.0 from ./CHANGELOG.md
  shipwright release-notes 1.4.0
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  #[command(flatten)]
  pub global: GlobalArgs,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors and command results
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum,
    global = true
  )]
  pub colors: ColorMode,

  /// Path to config file (default: .shipwright.toml in the current directory)
  #[arg(long, value_name = "FILE", global = true)]
  pub config: Option<std::path::PathBuf>,

  /// Ignore config file even if present
  #[arg(long, global = true)]
  pub no_config: bool,
}

impl GlobalArgs {
  /// Sets up tracing, verbosity and colors for the process.
  pub fn apply(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Rewrite the copyright header of source files from a template
  FixHeaders(FixHeadersArgs),

  /// Print the release notes of one version from the changelog
  ReleaseNotes(ReleaseNotesArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

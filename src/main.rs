//! # shipwright
//!
//! Release plumbing for app repositories: copyright headers and release notes.

use anyhow::Result;
use shipwright::cli::{Cli, Command, run_fix_headers, run_release_notes};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  cli.global.apply();

  match cli.command {
    Command::FixHeaders(args) => run_fix_headers(args, &cli.global),
    Command::ReleaseNotes(args) => run_release_notes(args, &cli.global),
  }
}
